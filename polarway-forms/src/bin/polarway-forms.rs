//! polarway-forms - interactive role-gated data entry in the terminal

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use polarway_forms::{
    run_session, FormsConfig, Notice, PasswordScheme, Presenter, RecordTable, SessionController,
};

/// polarway-forms - role-gated data entry
#[derive(Parser, Debug)]
#[command(name = "polarway-forms")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory holding config.yaml and form_data.xlsx
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Credential file (relative to --data-dir unless absolute)
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// Record spreadsheet (relative to --data-dir unless absolute)
    #[arg(long)]
    records: Option<PathBuf>,

    /// Store Argon2 hashes for new sign-ups instead of plaintext
    #[arg(long)]
    hash_passwords: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Cli {
    fn to_config(&self) -> FormsConfig {
        let mut config = FormsConfig::new(&self.data_dir);
        if let Some(path) = &self.credentials {
            config = config.with_credentials_file(path);
        }
        if let Some(path) = &self.records {
            config = config.with_records_file(path);
        }
        if self.hash_passwords {
            config = config.with_password_scheme(PasswordScheme::Argon2);
        }
        config
    }
}

/// Line-oriented presenter over stdin/stdout
struct TerminalPresenter {
    lines: Lines<BufReader<Stdin>>,
    out: Stdout,
}

impl TerminalPresenter {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            out: tokio::io::stdout(),
        }
    }

    async fn print(&mut self, text: &str) -> polarway_forms::Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl Presenter for TerminalPresenter {
    async fn choose(
        &mut self,
        prompt: &str,
        options: &[&str],
    ) -> polarway_forms::Result<Option<usize>> {
        let mut menu = format!("\n{prompt}\n");
        for (i, option) in options.iter().enumerate() {
            menu.push_str(&format!("  {}) {option}\n", i + 1));
        }
        self.print(&menu).await?;

        loop {
            self.print("> ").await?;
            let Some(line) = self.lines.next_line().await? else {
                return Ok(None);
            };
            let answer = line.trim();
            let by_number = answer
                .parse::<usize>()
                .ok()
                .filter(|n| (1..=options.len()).contains(n))
                .map(|n| n - 1);
            let by_label = options.iter().position(|o| o.eq_ignore_ascii_case(answer));
            match by_number.or(by_label) {
                Some(idx) => return Ok(Some(idx)),
                None => self.print("Please pick one of the listed options.\n").await?,
            }
        }
    }

    async fn text_input(
        &mut self,
        label: &str,
        secret: bool,
    ) -> polarway_forms::Result<Option<String>> {
        // plain line reader, no echo suppression
        let hint = if secret { " (visible)" } else { "" };
        self.print(&format!("{label}{hint}: ")).await?;
        Ok(self.lines.next_line().await?)
    }

    async fn notify(&mut self, notice: &Notice) -> polarway_forms::Result<()> {
        let tag = match notice {
            Notice::Success(_) => "ok",
            Notice::Error(_) => "error",
            Notice::Warning(_) => "warning",
            Notice::Info(_) => "info",
        };
        self.print(&format!("[{tag}] {}\n", notice.text())).await
    }

    async fn show_table(&mut self, table: &RecordTable) -> polarway_forms::Result<()> {
        let columns = table
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(table.header.len()))
            .max()
            .unwrap_or(0);
        let mut widths = vec![0usize; columns];
        for row in std::iter::once(&table.header).chain(table.rows.iter()) {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let render = |row: &[String]| -> String {
            let cells: Vec<String> = (0..columns)
                .map(|i| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    format!("{cell:<width$}", width = widths[i])
                })
                .collect();
            format!("  {}\n", cells.join(" | ").trim_end())
        };

        let mut out = String::from("\n");
        out.push_str(&render(&table.header[..]));
        out.push_str(&format!(
            "  {}\n",
            widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-")
        ));
        for row in &table.rows {
            out.push_str(&render(&row[..]));
        }
        out.push_str(&format!("  ({} records)\n", table.len()));
        self.print(&out).await
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = cli.to_config();
    let mut controller = SessionController::start(&config)
        .await
        .with_context(|| {
            format!(
                "cannot start: credential file {} must exist and contain a `users` mapping",
                config.credentials_path().display()
            )
        })?;

    let mut presenter = TerminalPresenter::new();
    presenter
        .print("User Input Form with Role-Based Access\n")
        .await?;

    run_session(&mut controller, &mut presenter)
        .await
        .context("session aborted")?;
    Ok(())
}
