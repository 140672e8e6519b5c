// SPDX-License-Identifier: Apache-2.0

use std::{env, fs, path::PathBuf};

const PLACEHOLDER: &str = "src/certs/builtin/placeholder.pem";
const PLACEHOLDER_MARKER: &str = "REPLACE THIS PLACEHOLDER";

fn main() {
    // Register the custom cfg flag for `placeholder_root_ca`.
    println!("cargo:rustc-check-cfg=cfg(placeholder_root_ca)");
    println!("cargo:rerun-if-env-changed=MQTTS_ROOT_CA_PEM");
    println!("cargo:rerun-if-changed={PLACEHOLDER}");

    let source = match env::var_os("MQTTS_ROOT_CA_PEM") {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(PLACEHOLDER),
    };
    println!("cargo:rerun-if-changed={}", source.display());

    let pem = fs::read(&source)
        .unwrap_or_else(|e| panic!("cannot read root CA {}: {e}", source.display()));

    let placeholder = String::from_utf8_lossy(&pem).contains(PLACEHOLDER_MARKER);
    if placeholder {
        if cfg!(feature = "deny_placeholder") {
            panic!(
                "the embedded root CA is still the placeholder; \
                 set MQTTS_ROOT_CA_PEM to your broker's root CA in PEM form"
            );
        }

        println!("cargo:rustc-cfg=placeholder_root_ca");
    }

    let out = PathBuf::from(env::var_os("OUT_DIR").expect("OUT_DIR is set by cargo"));
    fs::write(out.join("root_ca.pem"), pem).expect("cannot write root CA to OUT_DIR");
}
