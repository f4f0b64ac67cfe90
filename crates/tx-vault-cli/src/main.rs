//! tx-vault CLI - envelope-encrypted transaction records from the command line
//!
//! Records are written to `records.json` in the data directory. The master key
//! comes from `--master-key` or the `MASTER_KEY` environment variable and is
//! only needed by `encrypt` and `decrypt`; a malformed key is warned about
//! before use.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;
use zeroize::Zeroizing;

use envelope_core::{MasterKey, Payload};
use tx_vault::{
    check_master_key_format, EncryptRequest, FileStore, Result, SettingsManager,
    TransactionService, VaultError,
};

/// tx-vault - Envelope-encrypted transaction storage
#[derive(Parser)]
#[command(name = "tx-vault")]
#[command(author = "Symbia Labs")]
#[command(version = "0.1.0")]
#[command(about = "Encrypt, store and decrypt party transactions with AES-256-GCM envelope encryption")]
struct Args {
    /// Data directory for settings and records
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Hex-encoded 32-byte master key
    #[arg(long, global = true, env = "MASTER_KEY", hide_env_values = true)]
    master_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("data_dir", &self.data_dir)
            .field("master_key", &self.master_key.as_ref().map(|_| "[REDACTED]"))
            .field("command", &self.command)
            .finish()
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a fresh random master key
    Keygen,

    /// Encrypt and store a transaction payload
    Encrypt {
        /// Owning party identifier
        #[arg(long)]
        party_id: String,

        /// Payload as inline JSON
        #[arg(long, conflicts_with = "payload_file", required_unless_present = "payload_file")]
        payload: Option<String>,

        /// Read the payload JSON from a file
        #[arg(long)]
        payload_file: Option<PathBuf>,
    },

    /// Show a stored record without decrypting it
    Show {
        id: Uuid,
    },

    /// Decrypt a stored record
    Decrypt {
        id: Uuid,
    },

    /// List stored records, newest first
    List {
        /// Only list records for this party
        #[arg(long)]
        party_id: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("error[{}]: {}", e.code(), e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    if let Command::Keygen = args.command {
        let key = MasterKey::generate()?;
        println!("{}", key.to_hex().as_str());
        return Ok(());
    }

    let data_dir = match args.data_dir {
        Some(dir) => dir,
        None => FileStore::default_dir()?,
    };
    let settings = SettingsManager::new(&data_dir)?;

    init_logging(&settings.get().log_filter);

    let store = FileStore::with_dir(settings.record_dir())?;
    debug!("Using record store at {:?}", store.storage_dir());

    let master_key = match &args.command {
        Command::Encrypt { .. } | Command::Decrypt { .. } => {
            resolve_master_key(args.master_key)
        }
        _ => Zeroizing::new(String::new()),
    };

    let service = TransactionService::new(Arc::new(store), master_key);

    match args.command {
        Command::Keygen => Ok(()),
        Command::Encrypt {
            party_id,
            payload,
            payload_file,
        } => {
            let payload = read_payload(payload, payload_file).await?;
            let summary = service.encrypt(&EncryptRequest::new(party_id, payload)).await?;
            print_json(&summary)
        }
        Command::Show { id } => print_json(&service.get(id).await?),
        Command::Decrypt { id } => print_json(&service.decrypt(id).await?),
        Command::List { party_id } => print_json(&service.list(party_id.as_deref()).await?),
    }
}

/// Take the key from `--master-key` or `MASTER_KEY` (clap reads both), warning
/// when it is missing or malformed
fn resolve_master_key(key: Option<String>) -> Zeroizing<String> {
    let key = Zeroizing::new(key.unwrap_or_default());
    check_master_key_format(&key);
    key
}

/// Logs go to stderr so stdout stays machine-readable
fn init_logging(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn read_payload(inline: Option<String>, file: Option<PathBuf>) -> Result<Payload> {
    let text = match (inline, file) {
        (Some(text), _) => text,
        (None, Some(path)) => tokio::fs::read_to_string(&path).await?,
        (None, None) => {
            return Err(VaultError::InvalidRequest(
                "either --payload or --payload-file is required".to_string(),
            ))
        }
    };

    serde_json::from_str(&text)
        .map_err(|e| VaultError::InvalidRequest(format!("payload is not valid JSON: {}", e)))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn logs_while<R>(f: impl FnOnce() -> R) -> (R, String) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let result = tracing::subscriber::with_default(subscriber, f);
        let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        (result, text)
    }

    #[test]
    fn test_parse_encrypt_inline() {
        let args = Args::try_parse_from([
            "tx-vault",
            "encrypt",
            "--party-id",
            "party-1",
            "--payload",
            r#"{"amount": 1}"#,
        ])
        .unwrap();

        match args.command {
            Command::Encrypt {
                party_id, payload, ..
            } => {
                assert_eq!(party_id, "party-1");
                assert_eq!(payload.as_deref(), Some(r#"{"amount": 1}"#));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_encrypt_requires_a_payload_source() {
        assert!(Args::try_parse_from(["tx-vault", "encrypt", "--party-id", "p"]).is_err());
        assert!(Args::try_parse_from([
            "tx-vault",
            "encrypt",
            "--party-id",
            "p",
            "--payload",
            "{}",
            "--payload-file",
            "x.json",
        ])
        .is_err());
    }

    #[test]
    fn test_decrypt_requires_uuid() {
        assert!(Args::try_parse_from(["tx-vault", "decrypt", "not-a-uuid"]).is_err());

        let id = Uuid::new_v4().to_string();
        assert!(Args::try_parse_from(["tx-vault", "decrypt", id.as_str()]).is_ok());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "tx-vault",
            "list",
            "--data-dir",
            "/tmp/vault",
            "--party-id",
            "alice",
        ])
        .unwrap();

        assert_eq!(args.data_dir, Some(PathBuf::from("/tmp/vault")));
        assert!(matches!(args.command, Command::List { party_id: Some(ref p) } if p == "alice"));
    }

    #[test]
    fn test_malformed_master_key_warns() {
        let (key, logs) = logs_while(|| resolve_master_key(Some("abcd".to_string())));
        assert_eq!(key.as_str(), "abcd");
        assert!(logs.contains("WARN"));
        assert!(logs.contains("64 hex characters"));
        assert!(!logs.contains("abcd"));

        let (_, logs) = logs_while(|| resolve_master_key(None));
        assert!(logs.contains("64 hex characters"));
    }

    #[test]
    fn test_well_formed_master_key_does_not_warn() {
        let (_, logs) = logs_while(|| resolve_master_key(Some("ab".repeat(32))));
        assert!(logs.is_empty());
    }

    #[test]
    fn test_master_key_flag_parsed_and_redacted() {
        let key = "ef".repeat(32);
        let id = Uuid::new_v4().to_string();
        let args = Args::try_parse_from([
            "tx-vault",
            "decrypt",
            "--master-key",
            key.as_str(),
            id.as_str(),
        ])
        .unwrap();

        assert_eq!(args.master_key.as_deref(), Some(key.as_str()));
        let debug = format!("{:?}", args);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(&key));
    }

    #[tokio::test]
    async fn test_read_payload_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("payload.json");
        std::fs::write(&path, r#"{"to": "bob"}"#).unwrap();

        let payload = read_payload(None, Some(path)).await.unwrap();
        assert_eq!(payload, json!({ "to": "bob" }));
    }

    #[tokio::test]
    async fn test_read_payload_rejects_invalid_json() {
        let err = read_payload(Some("{oops".to_string()), None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invalid_request");
    }
}
