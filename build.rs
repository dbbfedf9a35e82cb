fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Version and target info for the startup log line
    built::write_built_file().expect("Failed to write build information");
}
