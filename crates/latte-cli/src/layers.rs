use clap::Subcommand;
use latte_core::{Layer, LayerState};
use latte_map::{load_layers, save_layers, LocalStore};

#[derive(Debug, Subcommand)]
pub enum LayersCommands {
    /// Print the persisted layer toggles
    Show,
    /// Flip one layer (btc, bch, ltc, xmr, user)
    Toggle { layer: Layer },
    /// Turn every layer back on
    Reset,
}

pub fn run(store: &LocalStore, command: LayersCommands) -> anyhow::Result<()> {
    let layers = apply(store, command)?;
    println!("{}", render(&layers));
    Ok(())
}

fn apply(store: &LocalStore, command: LayersCommands) -> anyhow::Result<LayerState> {
    let mut layers = load_layers(store);
    match command {
        LayersCommands::Show => return Ok(layers),
        LayersCommands::Toggle { layer } => {
            let enabled = layers.toggle(layer);
            tracing::info!(%layer, enabled, "layer toggled");
        }
        LayersCommands::Reset => layers = LayerState::default(),
    }
    save_layers(store, &layers)?;
    Ok(layers)
}

fn render(layers: &LayerState) -> String {
    Layer::ALL
        .iter()
        .map(|layer| {
            let mark = if layers.is_enabled(*layer) { "on" } else { "off" };
            format!("{:<12} {mark}", layer.label())
        })
        .collect::<Vec<_>>()
        .join("\n")
}
