//! Math helpers

use memlab::math::{circle_area, hyp, sqr, PI};

fn main() {
    pretty_env_logger::init();

    println!("PI      = {}", PI);
    println!("sqr(7)  = {}", sqr(7));
    println!("sqr(2.5) = {}", sqr(2.5));
    println!("hyp(3, 4) = {}", hyp(3.0, 4.0));
    println!("area(r=2) = {}", circle_area(2.0));
}
