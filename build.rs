// build.rs
//
// Stamps the build time into OUT_DIR/build_info.rs for the startup banner.

use chrono::Utc;
use std::{env, fs, path::Path};

fn main() {
    let out_dir = env::var("OUT_DIR").expect("cargo sets OUT_DIR for build scripts");
    let dest = Path::new(&out_dir).join("build_info.rs");

    let build_date = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
    fs::write(&dest, format!("pub const BUILD_DATE: &str = \"{build_date}\";\n"))
        .expect("write build_info.rs");

    println!("cargo:rerun-if-changed=build.rs");
}
