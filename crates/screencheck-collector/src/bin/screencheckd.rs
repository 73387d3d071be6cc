use std::io;

use screencheck_collector::CollectorServer;

fn main() -> io::Result<()> {
    let addr =
        std::env::var("SCREENCHECK_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let server = CollectorServer::from_env()
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))?;
    server.serve_http(&addr)
}
