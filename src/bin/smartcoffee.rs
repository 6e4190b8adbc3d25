use smartcoffee::solver::pipeline;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pipeline::run()
}
