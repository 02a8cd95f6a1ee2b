fn main() {
    if let Err(e) = casedesk_lib::run() {
        eprintln!("casedesk: {:#}", e);
        std::process::exit(1);
    }
}
