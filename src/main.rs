fn main() -> anyhow::Result<()> {
    gambitproxy::logging::init_tracing();
    gambitproxy::run()
}
