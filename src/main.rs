use clap::error::ErrorKind;
use clap::Parser;
use std::fs;

use groupmesh::{
    config::Config,
    constants::APP_VERSION,
    events::{
        dispatcher,
        model::{LogEvent, LogLevel, SystemEvent},
    },
    net,
    node::NodeContext,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "groupmesh relay node")]
struct Args {
    /// TCP port to listen on
    port: u16,

    /// Optional path to config file (TOML)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() {
    // A call with the wrong arity gets the usage text and a clean exit;
    // only genuinely invalid values signal failure.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            let code = match err.kind() {
                ErrorKind::MissingRequiredArgument
                | ErrorKind::DisplayHelp
                | ErrorKind::DisplayVersion => 0,
                _ => 2,
            };
            std::process::exit(code);
        }
    };

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| "config.toml".to_string());
    let config = match fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str::<Config>(&content) {
            Ok(cfg) => {
                println!("Loaded config from: {}", config_path);
                cfg
            }
            Err(err) => {
                eprintln!("Failed to parse config file '{}': {}", config_path, err);
                std::process::exit(1);
            }
        },
        Err(_) => Config::default(),
    };

    if let Some(log_cfg) = config.logging.as_ref() {
        groupmesh::events::init_events_from_config(Some(log_cfg)).await;
    } else {
        groupmesh::events::init_default_events().await;
    }

    let ctx = NodeContext::new(config.group_id(), args.port);
    {
        let mut meta = dispatcher::meta("node", LogLevel::Info);
        meta.corr_id = Some(dispatcher::correlation_id());
        dispatcher::emit(LogEvent::System(SystemEvent {
            meta,
            action: "identity_resolved".into(),
            detail: Some(format!(
                "v{} group={} ip={} port={}",
                APP_VERSION, ctx.group_id, ctx.ip, ctx.port
            )),
        }));
    }

    if let Err(e) = net::run(ctx, config.bootstrap_nodes()).await {
        eprintln!("Fatal: {:#}", e);
        std::process::exit(1);
    }
}
