fn main() {
    if let Err(e) = bezier_flow::flow::run() {
        eprintln!("bezier-flow: {:#}", e);
        std::process::exit(1);
    }
}
