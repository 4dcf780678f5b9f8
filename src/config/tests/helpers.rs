//! Layer builders shared by the configuration tests.

use ortho_config::MergeComposer;
use serde_json::Value;

use crate::JunketConfig;

/// Serialised [`JunketConfig::default`], the base layer every merge starts
/// from so that sparse layers still produce a full struct.
pub fn defaults_layer() -> Value {
    serde_json::to_value(JunketConfig::default()).expect("defaults should serialise")
}

/// Pushes `value` onto the composer as the named layer.
pub fn apply_layer(composer: &mut MergeComposer, layer_type: &str, value: Value) {
    match layer_type {
        "defaults" => composer.push_defaults(value),
        "file" => composer.push_file(value, None),
        "environment" => composer.push_environment(value),
        "cli" => composer.push_cli(value),
        _ => panic!("unknown layer type: {layer_type}"),
    }
}

/// Merges `(layer_type, value)` pairs on top of [`defaults_layer`].
pub fn build_config_from_layers(layers: &[(&str, Value)]) -> JunketConfig {
    let mut composer = MergeComposer::new();
    composer.push_defaults(defaults_layer());

    for (layer_type, value) in layers {
        apply_layer(&mut composer, layer_type, value.clone());
    }

    JunketConfig::merge_from_layers(composer.layers()).expect("merge should succeed")
}

/// Shorthand for a config whose only overrides arrive on the command line.
pub fn config_from_cli(cli: Value) -> JunketConfig {
    build_config_from_layers(&[("cli", cli)])
}
