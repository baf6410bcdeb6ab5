//! Atlas listing command

use super::registry_helper::load_registry;
use super::GlobalOptions;
use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct AtlasesCommand {
    /// Also list every region id and name
    #[arg(long)]
    regions: bool,
}

impl AtlasesCommand {
    pub fn execute(self, globals: &GlobalOptions) -> Result<()> {
        let registry = load_registry(globals)?;

        println!("Available atlases:");
        for atlas in registry.iter() {
            let [x, y, z] = atlas.volume().shape();
            println!("\n{}", atlas.name());
            if let Some(description) = atlas.description() {
                println!("  Description: {}", description);
            }
            println!("  Volume: {}x{}x{} voxels", x, y, z);
            println!("  Regions: {}", atlas.region_count());
            println!("  Background label: {}", atlas.background());

            if self.regions {
                for (id, name) in atlas.regions() {
                    println!("    {:>6}  {}", id, name);
                }
            }
        }

        Ok(())
    }
}
