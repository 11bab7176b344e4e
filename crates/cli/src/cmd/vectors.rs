pub fn run() -> anyhow::Result<()> {
    let vectors = keytree_verifier::generate_vectors()?;
    println!("{}", serde_json::to_string_pretty(&vectors)?);
    Ok(())
}
