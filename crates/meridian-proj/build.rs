use std::env;
use std::path::{Path, PathBuf};

const MIN_PROJ_VERSION: &str = "8.0";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=csrc/pj_capi.h");
    println!("cargo:rerun-if-changed=csrc/pj_capi.c");
    println!("cargo:rerun-if-env-changed=MERIDIAN_PROJ_PREBUILT_DIR");
    println!("cargo:rerun-if-env-changed=MERIDIAN_PROJ_SOURCE_DIR");
    println!("cargo:rerun-if-env-changed=MERIDIAN_PROJ_SKIP_NATIVE_BUILD");
    println!("cargo:rerun-if-env-changed=MERIDIAN_PROJ_CMAKE_PREFIX_PATH");

    if env_truthy("MERIDIAN_PROJ_SKIP_NATIVE_BUILD") {
        println!(
            "cargo:warning=MERIDIAN_PROJ_SKIP_NATIVE_BUILD=1: \
             skipping PROJ native build (check-only mode)"
        );
        return;
    }

    if let Some(prebuilt_dir) = env_path("MERIDIAN_PROJ_PREBUILT_DIR") {
        let include_dir = prebuilt_dir.join("include");
        let lib_dir = pick_lib_dir(&prebuilt_dir);
        if !include_dir.exists() || !lib_dir.exists() {
            panic!(
                "MERIDIAN_PROJ_PREBUILT_DIR is missing include/lib paths: {}",
                prebuilt_dir.display()
            );
        }
        compile_wrapper(&[include_dir]);
        link_proj(&lib_dir);
        return;
    }

    if env_path("MERIDIAN_PROJ_SOURCE_DIR").is_none() {
        // Link directives are emitted after the wrapper so the linker sees
        // libproj after the objects that need it.
        if let Ok(lib) = pkg_config::Config::new()
            .atleast_version(MIN_PROJ_VERSION)
            .cargo_metadata(false)
            .probe("proj")
        {
            compile_wrapper(&lib.include_paths);
            for dir in &lib.link_paths {
                println!("cargo:rustc-link-search=native={}", dir.display());
            }
            for name in &lib.libs {
                println!("cargo:rustc-link-lib={name}");
            }
            return;
        }
    }

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let proj_src = env_path("MERIDIAN_PROJ_SOURCE_DIR")
        .unwrap_or_else(|| manifest_dir.join("../../extern/PROJ"));
    if !proj_src.exists() {
        panic!(
            "PROJ >= {MIN_PROJ_VERSION} not found via pkg-config and no source at {}. \
             Set MERIDIAN_PROJ_SOURCE_DIR or MERIDIAN_PROJ_PREBUILT_DIR.",
            proj_src.display()
        );
    }

    let mut cmake_cfg = cmake::Config::new(&proj_src);
    cmake_cfg
        .define("BUILD_SHARED_LIBS", "ON")
        .define("BUILD_APPS", "OFF")
        .define("BUILD_TESTING", "OFF")
        .define("ENABLE_CURL", "OFF")
        .define("ENABLE_TIFF", "OFF")
        .define("CMAKE_POSITION_INDEPENDENT_CODE", "ON");

    if let Some(prefix_path) = env_string("MERIDIAN_PROJ_CMAKE_PREFIX_PATH") {
        cmake_cfg.define("CMAKE_PREFIX_PATH", prefix_path);
    }

    let proj_dst = cmake_cfg.build();

    compile_wrapper(&[proj_dst.join("include")]);
    link_proj(&pick_lib_dir(&proj_dst));
}

fn compile_wrapper(include_dirs: &[PathBuf]) {
    let mut build = cc::Build::new();
    build.file("csrc/pj_capi.c").include("csrc");
    for dir in include_dirs {
        build.include(dir);
    }
    build.flag_if_supported("-std=c11").compile("pj_capi");
}

fn link_proj(lib_dir: &Path) {
    println!("cargo:rustc-link-search=native={}", lib_dir.display());
    println!("cargo:rustc-link-lib=proj");

    if cfg!(target_os = "linux") {
        println!("cargo:rustc-link-lib=dylib=stdc++");
    } else if cfg!(target_os = "macos") {
        println!("cargo:rustc-link-lib=dylib=c++");
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn env_string(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.is_empty())
}

fn env_truthy(var: &str) -> bool {
    matches!(
        env::var(var).ok().as_deref(),
        Some("1") | Some("true") | Some("TRUE") | Some("yes") | Some("YES")
    )
}

fn pick_lib_dir(root: &Path) -> PathBuf {
    let lib = root.join("lib");
    if lib.exists() {
        return lib;
    }
    let lib64 = root.join("lib64");
    if lib64.exists() {
        return lib64;
    }
    lib
}
