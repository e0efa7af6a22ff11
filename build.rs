use std::{env, fs, path::PathBuf};

use node_config_compiler::{generate_from_path, VariantSelection};

fn main() {
    let manifest_dir =
        PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("missing CARGO_MANIFEST_DIR"));
    let config_path = match env::var_os("COMPANION_NODE_CONFIG") {
        Some(path) => PathBuf::from(path),
        None => manifest_dir.join("config/node.toml"),
    };

    println!("cargo:rerun-if-changed={}", config_path.display());
    println!("cargo:rerun-if-env-changed=COMPANION_NODE_CONFIG");

    let selection = VariantSelection::from_cargo_env()
        .unwrap_or_else(|e| panic!("invalid feature selection: {e}"));
    let generated = generate_from_path(&config_path, &selection).unwrap_or_else(|e| {
        panic!(
            "node config compile failed for {}: {e}",
            config_path.display()
        )
    });

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("missing OUT_DIR"));
    let out_file = out_dir.join("node_config.rs");
    fs::write(&out_file, generated)
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", out_file.display()));
}
