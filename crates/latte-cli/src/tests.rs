use super::*;

#[test]
fn parses_radius_with_negative_longitudes() {
    let cli = Cli::try_parse_from(["latte", "radius", "--bbox", "-33.95,18.40,-33.90,18.45"])
        .expect("expected valid cli args");

    let Commands::Radius { bbox } = cli.command else {
        panic!("expected radius command");
    };
    assert!((bbox.south - (-33.95)).abs() < f64::EPSILON);
    assert!((bbox.east - 18.45).abs() < f64::EPSILON);
}

#[test]
fn shops_radius_defaults_to_ten_km() {
    let cli = Cli::try_parse_from(["latte", "shops", "--lat", "37.77", "--lng", "-122.41"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Shops { radius, .. } if (radius - 10.0).abs() < f64::EPSILON
    ));
}

#[test]
fn rejects_bbox_with_three_numbers() {
    assert!(Cli::try_parse_from(["latte", "osm", "--bbox", "1,2,3"]).is_err());
}

#[test]
fn parses_layers_toggle() {
    let cli = Cli::try_parse_from(["latte", "layers", "toggle", "user-shops"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Layers {
            command: LayersCommands::Toggle {
                layer: latte_core::Layer::UserShops
            }
        }
    ));
}

#[test]
fn rejects_unknown_layer() {
    assert!(Cli::try_parse_from(["latte", "layers", "toggle", "eth"]).is_err());
}

#[test]
fn parses_browse() {
    let cli = Cli::try_parse_from(["latte", "browse"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Browse));
}

#[test]
fn command_is_required() {
    assert!(Cli::try_parse_from(["latte"]).is_err());
}
