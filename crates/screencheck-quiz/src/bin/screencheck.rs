use std::io::{self, BufRead, Write};
use std::sync::Arc;

use screencheck_client::{CollectorClient, CollectorConfig};
use screencheck_core::ScoreResult;
use screencheck_quiz::{DeliveryReport, QuizDriver};

fn main() -> io::Result<()> {
    let base_url = std::env::var("SCREENCHECK_COLLECTOR_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());
    let client = CollectorClient::new(CollectorConfig::new(base_url))
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;
    let mut driver = QuizDriver::new(Arc::new(client));

    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());
    let mut stdout = io::stdout();

    writeln!(stdout, "screencheck: a quick technology-dependence self-check")?;

    loop {
        while let Some(prompt) = driver.question() {
            let percent = prompt.number * 100 / prompt.total;
            writeln!(stdout)?;
            writeln!(
                stdout,
                "Question {} of {} ({percent}%)",
                prompt.number, prompt.total
            )?;
            writeln!(stdout, "{}", prompt.text)?;

            let Some(answer) = read_yes_no(&mut reader, &mut stdout, "> ")? else {
                return Ok(());
            };

            let mut shown = Ok(());
            let report = driver.answer(answer, |result| {
                shown = print_result(&mut stdout, result);
            });
            shown?;

            if let Some(report) = report {
                match report.delivery {
                    None => {}
                    Some(DeliveryReport::Accepted(receipt)) => {
                        writeln!(stdout, "Response recorded as {}.", receipt.id)?;
                    }
                    Some(DeliveryReport::Failed(message)) => {
                        eprintln!("screencheck: could not store the response: {message}");
                        writeln!(stdout, "Your result above still stands; only storing it failed.")?;
                    }
                }
                print_recap(&mut stdout, &driver)?;
            }
        }

        writeln!(stdout)?;
        let Some(again) = read_yes_no(&mut reader, &mut stdout, "Take the quiz again? ")? else {
            return Ok(());
        };
        if !again {
            return Ok(());
        }
        driver.reset();
    }
}

fn print_result(stdout: &mut io::Stdout, result: &ScoreResult) -> io::Result<()> {
    writeln!(stdout)?;
    writeln!(
        stdout,
        "Dependence level: {}",
        result.level.as_str().to_uppercase()
    )?;
    writeln!(stdout, "Score: {:.4}", result.score)?;
    writeln!(stdout, "{}", result.message)
}

fn print_recap(stdout: &mut io::Stdout, driver: &QuizDriver) -> io::Result<()> {
    writeln!(stdout)?;
    writeln!(stdout, "Your answers:")?;
    for (text, slot) in driver.recap() {
        let mark = match slot {
            Some(true) => "yes",
            Some(false) => "no",
            None => "-",
        };
        writeln!(stdout, "  {mark:>3}  {text}")?;
    }
    Ok(())
}

fn read_yes_no(
    reader: &mut impl BufRead,
    stdout: &mut io::Stdout,
    prompt: &str,
) -> io::Result<Option<bool>> {
    let mut line = String::new();
    loop {
        write!(stdout, "{prompt}[y/n] ")?;
        stdout.flush()?;
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            writeln!(stdout)?;
            return Ok(None);
        }
        match line.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => return Ok(Some(true)),
            "n" | "no" => return Ok(Some(false)),
            _ => writeln!(stdout, "Please answer yes or no.")?,
        }
    }
}
