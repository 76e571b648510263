fn main() -> Result<(), testmatrix::ReporterError> {
    testmatrix::build_env::emit_from_env(testmatrix::DEFAULT_PREFIX)?;
    Ok(())
}
