//! Native entry point: `partview <view>`.

use anyhow::anyhow;
use partview::{app, view::ViewPreset};

fn main() -> anyhow::Result<()> {
    let name = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "slider".to_string());
    let preset = ViewPreset::from_name(&name).ok_or_else(|| {
        anyhow!("unknown view {name:?} (expected slider, spring, housing or combined)")
    })?;
    app::run(preset)
}
