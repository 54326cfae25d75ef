use ofstest_core::modules;

use crate::args::ListArgs;
use crate::exit_codes;

pub fn list(_args: ListArgs) -> anyhow::Result<i32> {
    let registered = modules::builtin()?;
    for module in &registered {
        let config = &module.config;
        println!("{} ({})", config.header, config.prefix);
        println!(
            "  mount_fs: {}  mount_as_fuse: {}  run_client: {}",
            config.mount_fs, config.mount_as_fuse, config.run_client
        );
        for entry in module.entries() {
            println!("  - {}", entry.name());
        }
    }
    Ok(exit_codes::SUCCESS)
}
