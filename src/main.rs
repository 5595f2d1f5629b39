fn main() {
    if let Err(err) = nenpyo_renderer::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
