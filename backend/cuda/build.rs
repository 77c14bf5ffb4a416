//! Rust script to compile non-rust files.
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

/// Compiles and links the cuda wrapper, the cuda runtime and the benchmark kernels.
fn compile_link_cuda() {
    let mut builder = cc::Build::new();

    // If CUDA_HOME is defined, use the cuda headers and libraries from there.
    println!("cargo:rerun-if-env-changed=CUDA_HOME");
    if let Some(cuda_home) = env::var_os("CUDA_HOME").map(PathBuf::from) {
        println!(
            "cargo:rustc-link-search=native={}",
            cuda_home.join("lib64").display()
        );
        builder.include(cuda_home.join("include"));
    }

    builder
        .flag("-Werror")
        .file("src/api/wrapper.c")
        .compile("libshmembench_cuda_wrapper.a");
    add_dependency(Path::new("src/api/wrapper.c"));
    add_lib("cudart");

    // The kernels are built separately, with nvcc.
    println!("cargo:rerun-if-env-changed=SHMEM_KERNELS_DIR");
    if let Some(dir) = env::var_os("SHMEM_KERNELS_DIR") {
        println!("cargo:rustc-link-search=native={}", Path::new(&dir).display());
    }
    add_lib("shmem_kernels_cuda");
}

fn main() {
    if cfg!(feature = "real_gpu") {
        compile_link_cuda();
    }
}
