//! Deploys `TestERC20A`, `TestERC20WNOM` and `Gravity` to a running dev
//! chain and prints the resulting addresses and checkpoint as JSON.

use std::path::PathBuf;

use alloy_primitives::B256;
use clap::Parser;
use eyre::{Result, WrapErr as _};
use gravity_test_utils::{RpcChain, artifact::ArtifactDir, config::FixtureConfig, deploy_contracts};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "gravity-deploy")]
#[command(about = "Deploy the Gravity bridge test contracts to a dev chain")]
struct Args {
    /// TOML fixture config; flags override its values
    #[arg(long, env = "GRAVITY_CONFIG")]
    config: Option<PathBuf>,

    /// Dev chain JSON-RPC URL
    #[arg(long, env = "GRAVITY_RPC_URL")]
    rpc_url: Option<String>,

    /// Directory with the compiled contract artifacts
    #[arg(long, env = "GRAVITY_ARTIFACTS_DIR")]
    artifacts: Option<PathBuf>,

    /// Gravity id, at most 31 bytes
    #[arg(long)]
    gravity_id: Option<String>,

    /// Number of dev accounts to use as validators
    #[arg(long)]
    validators: Option<usize>,

    /// Power of each validator
    #[arg(long)]
    power: Option<u64>,

    /// Deployer private key (hex); defaults to the first dev account
    #[arg(long, env = "GRAVITY_DEPLOYER_KEY")]
    private_key: Option<B256>,
}

impl Args {
    fn into_config(self) -> Result<FixtureConfig> {
        let mut config = match &self.config {
            Some(path) => FixtureConfig::from_file(path)
                .wrap_err_with(|| format!("failed reading config `{}`", path.display()))?,
            None => {
                let artifacts = self
                    .artifacts
                    .clone()
                    .ok_or_else(|| eyre::eyre!("either --artifacts or --config is required"))?;
                FixtureConfig::new(artifacts)
            }
        };

        if let Some(rpc_url) = self.rpc_url {
            config.rpc_url = rpc_url;
        }
        if let Some(artifacts) = self.artifacts {
            config.artifacts_dir = artifacts;
        }
        if let Some(gravity_id) = self.gravity_id {
            config.gravity_id = Some(gravity_id);
        }
        if let Some(validators) = self.validators {
            config.validators = validators;
        }
        if let Some(power) = self.power {
            config.power = power;
        }
        if let Some(key) = self.private_key {
            config.private_key = Some(key);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::from_default_env()
                .add_directive("gravity_deploy=info".parse()?)
                .add_directive("gravity_test_utils=info".parse()?),
        )
        .init();

    let config = Args::parse().into_config()?;
    let gravity_id = config.gravity_id().wrap_err("invalid gravity id")?;
    let (validators, powers) = config.validator_set()?;
    let signer = config.deployer().wrap_err("invalid deployer key")?;

    info!(
        rpc_url = %config.rpc_url,
        artifacts = %config.artifacts_dir.display(),
        validators = validators.len(),
        "deploying bridge fixtures"
    );

    let chain = RpcChain::connect(&config.rpc_url, signer)
        .await
        .wrap_err_with(|| format!("failed connecting to `{}`", config.rpc_url))?;
    let artifacts = ArtifactDir::new(&config.artifacts_dir);

    let deployment = deploy_contracts(&chain, &artifacts, gravity_id, &validators, &powers)
        .await
        .wrap_err("deployment failed")?;

    info!(
        gravity = %deployment.gravity.address,
        checkpoint = %deployment.checkpoint,
        "deployment complete"
    );
    println!("{}", serde_json::to_string_pretty(&deployment)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory as _, FromArgMatches as _};

    use super::*;

    /// The command with every `env` fallback removed, so variables set in
    /// the test process do not leak into parsed flags.
    fn command() -> clap::Command {
        Args::command()
            .mut_args(|arg| arg.env(None::<&'static str>))
    }

    fn parse(argv: &[&str]) -> Args {
        let matches = command().try_get_matches_from(argv).unwrap();
        Args::from_arg_matches(&matches).unwrap()
    }

    #[test]
    fn test_parse_ignores_environment() {
        let command = command();
        assert!(command.get_arguments().all(|arg| arg.get_env().is_none()));

        // the binary itself still reads these
        let envs: Vec<_> = Args::command()
            .get_arguments()
            .filter_map(|arg| arg.get_env())
            .map(|env| env.to_string_lossy().into_owned())
            .collect();
        for env in [
            "GRAVITY_CONFIG",
            "GRAVITY_ARTIFACTS_DIR",
            "GRAVITY_DEPLOYER_KEY",
        ] {
            assert!(envs.iter().any(|e| e == env), "missing {env}");
        }
    }

    #[test]
    fn test_flags_without_config() {
        let config = parse(&[
            "gravity-deploy",
            "--artifacts",
            "out",
            "--gravity-id",
            "bar",
            "--validators",
            "2",
        ])
        .into_config()
        .unwrap();

        assert_eq!(config.artifacts_dir, PathBuf::from("out"));
        assert_eq!(config.gravity_id.as_deref(), Some("bar"));
        assert_eq!(config.validators, 2);
        assert_eq!(config.rpc_url, gravity_test_utils::config::DEFAULT_RPC_URL);
    }

    #[test]
    fn test_artifacts_required_without_config() {
        let args = parse(&["gravity-deploy", "--power", "10"]);
        assert!(args.into_config().is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixtures.toml");
        std::fs::write(&path, "artifacts_dir = \"from-file\"\npower = 7\n").unwrap();

        let config = parse(&[
            "gravity-deploy",
            "--config",
            path.to_str().unwrap(),
            "--rpc-url",
            "http://localhost:9545",
        ])
        .into_config()
        .unwrap();

        assert_eq!(config.artifacts_dir, PathBuf::from("from-file"));
        assert_eq!(config.power, 7);
        assert_eq!(config.rpc_url, "http://localhost:9545");
    }
}
