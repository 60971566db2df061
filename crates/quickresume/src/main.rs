fn main() -> anyhow::Result<()> {
    quickresume::cli::main()
}
