use ofstest_core::config::ClusterConfig;
use ofstest_core::modules;

use crate::args::ValidateArgs;
use crate::exit_codes;

pub fn validate(args: ValidateArgs) -> anyhow::Result<i32> {
    let config = match ClusterConfig::from_path(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };
    let registered = match modules::builtin() {
        Ok(modules) => modules,
        Err(e) => {
            eprintln!("{e}");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };
    let entries: usize = registered.iter().map(|m| m.entries().len()).sum();
    println!(
        "ok: {} nodes, {} modules, {} entries",
        config.nodes.len(),
        registered.len(),
        entries
    );
    Ok(exit_codes::SUCCESS)
}
