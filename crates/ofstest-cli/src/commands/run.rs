use std::fs::File;

use ofstest_core::config::ClusterConfig;
use ofstest_core::engine::scheduler::Scheduler;
use ofstest_core::modules;
use ofstest_core::network::{ClusterNetwork, Network};
use ofstest_core::report;
use ofstest_core::report::json::JsonSummary;

use crate::args::RunArgs;
use crate::exit_codes;

pub async fn run(args: RunArgs) -> anyhow::Result<i32> {
    let config = match ClusterConfig::from_path(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let mut modules = match modules::builtin() {
        Ok(modules) => modules,
        Err(e) => {
            eprintln!("{e}");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };
    if let Some(prefix) = &args.module {
        modules.retain(|m| m.config.prefix == *prefix);
        if modules.is_empty() {
            eprintln!("config error: no module with prefix {}", prefix);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    }

    let network: Box<dyn Network> = if args.local {
        Box::new(ClusterNetwork::local(&config))
    } else {
        match ClusterNetwork::from_config(&config) {
            Ok(network) => Box::new(network),
            Err(e) => {
                eprintln!("{e}");
                return Ok(exit_codes::CONFIG_ERROR);
            }
        }
    };

    let scheduler = Scheduler {
        entry_timeout_secs: args.timeout_secs,
    };
    let summaries = scheduler.run_all(&modules, network.as_ref()).await;

    report::console::print_summary(&summaries);
    if let Some(path) = &args.json {
        let file = File::create(path)?;
        report::json::write(file, &JsonSummary::new(summaries.clone()))?;
    }

    let counts = report::counts(&summaries);
    let aborted = summaries.iter().any(|s| s.partial);
    let infra = aborted
        || counts.errored > 0
        || summaries
            .iter()
            .any(|s| s.mount_error.is_some() || s.unmount_error.is_some());
    Ok(if infra {
        exit_codes::INFRA_ERROR
    } else if counts.failed > 0 {
        exit_codes::TEST_FAILURES
    } else {
        exit_codes::SUCCESS
    })
}
