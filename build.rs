//! Build script for the Elite tuner driver
//!
//! Handles:
//! - Memory layout configuration for the demo binary
//! - Embedding the chip's static tables (boot image, front-end registers,
//!   beamformer coefficients) from files named by environment variables

use std::env;
use std::fs;
use std::path::PathBuf;

/// (environment variable, file name in `OUT_DIR`)
const TABLES: [(&str, &str); 5] = [
    ("ELITE_BOOT_IMAGE", "boot_image.bin"),
    ("ELITE_FE_FM", "fe_fm.bin"),
    ("ELITE_FE_AM", "fe_am.bin"),
    ("ELITE_FE_WB", "fe_wb.bin"),
    ("ELITE_COEFFICIENTS", "coefficients.bin"),
];

fn main() {
    // Tell Cargo to re-run this if the linker script changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    // Link memory.x from project directory
    println!("cargo:rustc-link-search={}", env::var("CARGO_MANIFEST_DIR").unwrap());

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    for (var, file) in TABLES {
        println!("cargo:rerun-if-env-changed={var}");

        // Missing tables are embedded empty; the driver reports them at runtime
        let bytes = match env::var(var) {
            Ok(path) => {
                println!("cargo:rerun-if-changed={path}");
                fs::read(&path).unwrap_or_else(|e| panic!("{var}={path}: {e}"))
            }
            Err(_) => Vec::new(),
        };

        fs::write(out_dir.join(file), bytes).unwrap();
    }
}
