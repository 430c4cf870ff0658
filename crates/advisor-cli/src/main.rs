//! Interactive investment analysis REPL
//!
//! # Usage
//!
//! ```bash
//! # Set up environment variables
//! export NEWS_API_KEY="..."
//! export OPENAI_API_KEY="..."
//! # Optional: OPENAI_API_BASE, OPENAI_MODEL, SMTP_HOST/PORT/USERNAME/PASSWORD/RECIPIENT
//!
//! cargo run --bin advisor -p advisor-cli
//! ```

mod render;

use advisor_core::{AdvisorConfig, AnalysisPipeline, AnalysisReport, StrategyMailer, TickerResolver};
use advisor_llm::{OpenAiConfig, OpenAiProvider, TextGenerator};
use std::env;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

fn print_banner() {
    println!(
        r#"
╔══════════════════════════════════════════════════════════════╗
║                미국 주식 투자 분석 AI AGENT                  ║
║                                                              ║
║  Commands:                                                   ║
║    /analyze <keyword> <ticker> [days] - 투자 분석 실행       ║
║    /ticker <company name>             - 티커(종목 코드) 검색 ║
║    /email                             - 최근 전략 이메일 전송║
║    /help                              - 도움말               ║
║    /exit                              - 종료                 ║
║                                                              ║
║  Example:                                                    ║
║    /analyze Tesla TSLA 30                                    ║
╚══════════════════════════════════════════════════════════════╝
"#
    );
}

fn print_help() {
    println!("Commands:");
    println!("  /analyze <keyword> <ticker> [days]  뉴스+주가 기반 투자 전략 생성 (기본 30일)");
    println!("  /ticker <company name>              회사 이름으로 티커 검색");
    println!("  /email                              마지막 전략을 이메일로 전송");
    println!("  /exit                               종료");
}

/// Split `/analyze` arguments into keyword, ticker and period.
///
/// The keyword may span multiple tokens ("General Motors"); a trailing
/// all-digit token is taken as the period, defaulting to 30 days.
fn parse_analyze_args<'a>(args: &[&'a str]) -> Option<(String, &'a str, &'a str)> {
    if args.len() < 2 {
        return None;
    }
    let (days, rest) = match args.split_last() {
        Some((last, head)) if args.len() > 2 && last.chars().all(|c| c.is_ascii_digit()) => {
            (*last, head)
        }
        _ => ("30", args),
    };
    let (ticker, keyword_tokens) = rest.split_last()?;
    if keyword_tokens.is_empty() {
        return None;
    }
    Some((keyword_tokens.join(" "), *ticker, days))
}

fn provider_from_env(config: &AdvisorConfig) -> advisor_llm::Result<OpenAiProvider> {
    let mut llm_config = OpenAiConfig::new(config.openai_api_key.clone()).with_timeout(180);
    if let Ok(api_base) = env::var("OPENAI_API_BASE") {
        llm_config = llm_config.with_api_base(api_base);
    }
    OpenAiProvider::with_config(llm_config)
}

fn print_report(report: &AnalysisReport) {
    println!("{}\n", report.news_text);
    println!("{}\n", report.price_summary_text);

    if let Some(chart) = &report.chart {
        let path = render::chart_output_path(&chart.symbol);
        match render::render_png(chart, &path) {
            Ok(()) => println!("📈 주가 차트: {}\n", path.display()),
            Err(e) => eprintln!("Chart rendering failed: {e}\n"),
        }
    }

    println!("[GPT 투자 전략]\n{}\n", report.strategy_text);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "warn,advisor_core=info".to_string()),
        )
        .init();

    print_banner();

    let config = Arc::new(AdvisorConfig::builder().with_env_keys().build()?);
    if config.news_api_key.is_empty() {
        eprintln!("Warning: NEWS_API_KEY not set, news search will fail");
    }
    if config.openai_api_key.is_empty() {
        eprintln!("Warning: OPENAI_API_KEY not set, generation calls will fail");
    }

    let generator: Arc<dyn TextGenerator> = Arc::new(provider_from_env(&config)?);
    let pipeline = AnalysisPipeline::new(Arc::clone(&config), Arc::clone(&generator))?;
    let resolver = TickerResolver::new(Arc::clone(&config), Arc::clone(&generator));
    let mailer = match &config.smtp {
        Some(smtp) => Some(StrategyMailer::new(smtp)?),
        None => None,
    };

    println!("Model: {}", config.model);
    println!("Email delivery: {}\n", if mailer.is_some() { "enabled" } else { "disabled" });

    // Last successful (company, strategy) pair for the email trigger.
    let mut last_strategy: Option<(String, String)> = None;

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("advisor> ");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let tokens: Vec<&str> = input.split_whitespace().collect();
        match tokens[0] {
            "/exit" | "/quit" => {
                println!("Goodbye!");
                break;
            }
            "/help" => print_help(),
            "/analyze" => {
                let Some((keyword, ticker, days)) = parse_analyze_args(&tokens[1..]) else {
                    println!("Usage: /analyze <keyword> <ticker> [days]");
                    continue;
                };

                println!("Analyzing {keyword} ({ticker}) over {days} days...\n");
                let report = pipeline.run(&keyword, ticker, days).await;
                print_report(&report);

                if report.is_success() {
                    last_strategy = Some((keyword, report.strategy_text.clone()));
                }
            }
            "/ticker" => {
                if tokens.len() < 2 {
                    println!("Usage: /ticker <company name>");
                    continue;
                }
                let company = tokens[1..].join(" ");
                let ticker = resolver.resolve(&company).await;
                println!("{company} → {ticker}\n");
            }
            "/email" => {
                let Some(mailer) = &mailer else {
                    println!("Email delivery is not configured (set the SMTP_* variables)");
                    continue;
                };
                let Some((company, strategy)) = &last_strategy else {
                    println!("No strategy to send yet; run /analyze first");
                    continue;
                };
                let status = mailer.send(company, strategy).await;
                println!("{status}\n");
            }
            _ => {
                println!("Unknown command: {}", tokens[0]);
                print_help();
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_args_with_explicit_days() {
        let parsed = parse_analyze_args(&["Tesla", "TSLA", "30"]);
        assert_eq!(parsed, Some(("Tesla".to_string(), "TSLA", "30")));
    }

    #[test]
    fn test_analyze_args_default_days() {
        let parsed = parse_analyze_args(&["Tesla", "TSLA"]);
        assert_eq!(parsed, Some(("Tesla".to_string(), "TSLA", "30")));
    }

    #[test]
    fn test_analyze_args_multi_word_keyword() {
        let parsed = parse_analyze_args(&["General", "Motors", "GM"]);
        assert_eq!(parsed, Some(("General Motors".to_string(), "GM", "30")));

        let parsed = parse_analyze_args(&["General", "Motors", "GM", "7"]);
        assert_eq!(parsed, Some(("General Motors".to_string(), "GM", "7")));
    }

    #[test]
    fn test_analyze_args_too_few_tokens() {
        assert_eq!(parse_analyze_args(&[]), None);
        assert_eq!(parse_analyze_args(&["Tesla"]), None);
    }
}
