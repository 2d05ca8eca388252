use std::process;

fn main() {
    if let Err(err) = company_appointments::app::run() {
        eprintln!("fatal: {err}");
        process::exit(1);
    }
}
