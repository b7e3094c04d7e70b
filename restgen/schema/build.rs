//! Generates the GitHub client and serializers into `$OUT_DIR/restgen/`.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    restgen_gen::Builder::new()
        .src_root("src")
        .file("src/github.rs")
        .compile()?;
    Ok(())
}
