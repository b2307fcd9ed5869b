use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    thrapy::cli::main()
}
