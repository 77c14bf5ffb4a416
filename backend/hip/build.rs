//! Compiles the HIP wrapper and links the ROCm runtime.
use cc;
use std::env;
use std::path::{Path, PathBuf};

/// Orders to Cargo to link a library.
fn add_lib(lib: &str) {
    println!("cargo:rustc-link-lib={}", lib);
}

fn add_dependency(dep: &Path) {
    println!("cargo:rerun-if-changed={}", dep.display());
}

/// Compiles and links the HIP wrapper, the HIP runtime and the benchmark kernels.
fn compile_link_hip() {
    let mut builder = cc::Build::new();

    // Use the ROCm installation from ROCM_PATH, or the default one.
    println!("cargo:rerun-if-env-changed=ROCM_PATH");
    let rocm_path = env::var_os("ROCM_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/opt/rocm"));
    println!(
        "cargo:rustc-link-search=native={}",
        rocm_path.join("lib").display()
    );

    builder
        .include(rocm_path.join("include"))
        .define("__HIP_PLATFORM_AMD__", None)
        .flag("-Wall")
        .file("src/api/wrapper.c")
        .compile("libshmembench_hip_wrapper.a");
    add_dependency(Path::new("src/api/wrapper.c"));
    add_lib("amdhip64");

    // The kernels are built separately, with hipcc.
    println!("cargo:rerun-if-env-changed=SHMEM_KERNELS_DIR");
    if let Some(dir) = env::var_os("SHMEM_KERNELS_DIR") {
        println!("cargo:rustc-link-search=native={}", Path::new(&dir).display());
    }
    add_lib("shmem_kernels_hip");
}

fn main() {
    if cfg!(feature = "real_gpu") {
        compile_link_hip();
    }
}
