//! CLI command handlers

use anyhow::{anyhow, Context, Result};
use herald_core::events::TracingDispatcher;
use herald_core::http::ReqwestHttpClient;
use herald_core::models::{ChatMessage, Configuration, Message, SmsMessage};
use herald_core::services::logging;
use herald_core::transport::{Transport, TransportContext, TransportResolver};
use std::path::PathBuf;
use std::sync::Arc;

/// Where `send` delivers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// DSN string given on the command line
    Dsn(String),
    /// Transport name from the `[transports]` table
    Transport(String),
}

impl Target {
    pub fn from_args(dsn: Option<String>, transport: Option<String>) -> Result<Self> {
        match (dsn, transport) {
            (Some(dsn), None) => Ok(Target::Dsn(dsn)),
            (None, Some(name)) => Ok(Target::Transport(name)),
            (None, None) => Err(anyhow!("Either --dsn or --transport is required")),
            (Some(_), Some(_)) => Err(anyhow!("--dsn and --transport cannot be combined")),
        }
    }
}

/// Message flags of the `send` command
#[derive(Debug, Clone)]
pub struct MessageArgs {
    pub subject: String,
    pub sms: Option<String>,
    pub chat: bool,
    pub recipient: Option<String>,
}

impl MessageArgs {
    pub fn into_message(self, transport: Option<&str>) -> Result<Message> {
        match (self.sms, self.chat) {
            (Some(phone), false) => {
                let mut sms = SmsMessage::new(phone, self.subject);
                if let Some(name) = transport {
                    sms = sms.transport(name);
                }
                Ok(sms.into())
            }
            (None, true) => {
                let mut chat = ChatMessage::new(self.subject);
                if let Some(recipient) = self.recipient {
                    chat = chat.recipient(recipient);
                }
                if let Some(name) = transport {
                    chat = chat.transport(name);
                }
                Ok(chat.into())
            }
            _ => Err(anyhow!("Choose exactly one of --sms <PHONE> or --chat")),
        }
    }
}

/// Resolve the config file path, expanding a leading `~/`
fn config_path(config_file: Option<String>) -> Result<PathBuf> {
    match config_file {
        Some(path) if path.starts_with("~/") => {
            let home = std::env::var("HOME")
                .map_err(|_| anyhow!("HOME environment variable not set"))?;
            Ok(PathBuf::from(path.replacen("~/", &format!("{}/", home), 1)))
        }
        Some(path) => Ok(PathBuf::from(path)),
        None => Configuration::default_config_path()
            .map_err(|e| anyhow!("Failed to get default config path: {}", e)),
    }
}

fn load_config(config_file: Option<String>) -> Result<Configuration> {
    let path = config_path(config_file)?;
    Configuration::load_from_file(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Install logging and build a resolver with the default factories
fn build_resolver(config: &Configuration) -> Result<TransportResolver> {
    logging::init_logging(config.log_level)
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    let http =
        ReqwestHttpClient::new(config.http.timeout()).context("Failed to build HTTP client")?;
    let context = TransportContext::new(Arc::new(http), Some(Arc::new(TracingDispatcher)));
    let resolver = TransportResolver::with_defaults(context);
    tracing::debug!(
        schemes = %resolver.supported_schemes().join(","),
        "Transport resolver ready"
    );
    Ok(resolver)
}

/// Handle the 'send' command
pub async fn handle_send(
    target: Target,
    message: MessageArgs,
    config_file: Option<String>,
    json: bool,
) -> Result<()> {
    let config = load_config(config_file)?;
    let resolver = build_resolver(&config)?;

    let (channel, transport, message): (String, Box<dyn Transport>, Message) = match target {
        Target::Dsn(dsn) => (
            "dsn".to_string(),
            resolver.resolve_string(&dsn).context("Failed to resolve DSN")?,
            message.into_message(None)?,
        ),
        Target::Transport(name) => {
            let transports = resolver
                .resolve_named(&config.transports)
                .context("Failed to resolve configured transports")?;
            let message = message.into_message(Some(name.as_str()))?;
            (name, Box::new(transports) as Box<dyn Transport>, message)
        }
    };

    let sent = match transport.send(&message).await {
        Ok(sent) => sent,
        Err(e) => {
            logging::log_error(&channel, &e.to_string());
            return Err(anyhow::Error::new(e).context("Failed to send notification"));
        }
    };
    logging::log_delivery(&channel, sent.transport(), sent.message_id());

    if json {
        println!("{}", serde_json::to_string_pretty(&sent)?);
    } else {
        println!("✅ Sent via {}", sent.transport());
        if let Some(id) = sent.message_id() {
            println!("🆔 Message id: {}", id);
        }
    }

    Ok(())
}

/// Handle the 'describe' command
pub async fn handle_describe(dsn: Option<String>, config_file: Option<String>) -> Result<()> {
    if let Some(dsn) = dsn {
        let resolver = build_resolver(&Configuration::default())?;
        let transport = resolver.resolve_string(&dsn).context("Failed to resolve DSN")?;
        println!("{}", transport.describe());
        return Ok(());
    }

    let config = load_config(config_file)?;
    let resolver = build_resolver(&config)?;
    for (name, dsn) in &config.transports {
        let transport = resolver
            .resolve_string(dsn)
            .with_context(|| format!("Failed to resolve transport \"{}\"", name))?;
        println!("{}: {}", name, transport.describe());
    }

    Ok(())
}

/// Handle the 'check' command
pub async fn handle_check(config_file: Option<String>) -> Result<()> {
    let config = load_config(config_file)?;

    println!("🔍 Validating configuration...");
    if let Err(errors) = config.validate() {
        println!("❌ Configuration validation failed:");
        for error in &errors {
            println!("   - {}", error);
        }
        return Err(anyhow!("Configuration validation failed"));
    }

    let resolver = build_resolver(&config)?;
    let transports = resolver
        .resolve_named(&config.transports)
        .context("Failed to resolve configured transports")?;

    println!("✅ Configuration is valid");
    for (name, transport) in transports.iter() {
        println!("   {}: {}", name, transport.describe());
    }

    Ok(())
}
