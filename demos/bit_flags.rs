//! Bit masking playground

use memlab::bits::{self, format_bits, reinterpret_i32, BitField, RenderFlags};

const MODE: BitField = BitField::new(0, 4);
const ID: BitField = BitField::new(4, 8);
const ENABLED: BitField = BitField::new(12, 1);

fn main() {
    pretty_env_logger::init();

    println!("== Bit masking playground ==\n");

    // Part 1: single bits
    let mut x = 0u32;
    bits::set(&mut x, 3);
    bits::set(&mut x, 7);
    bits::toggle(&mut x, 3);
    println!("x = {}  (bin {})", x, format_bits(x, 16));
    println!("bit7? {}\n", bits::test(x, 7) as u8);

    // Part 2: packed fields
    // bits 0..3  : mode    (4 bits)
    // bits 4..11 : id      (8 bits)
    // bit  12    : enabled (1 bit)
    let mut packed = 0u32;
    MODE.set(&mut packed, 9);
    ID.set(&mut packed, 200);
    ENABLED.set(&mut packed, 1);

    println!("packed = {} (bin {})", packed, format_bits(packed, 16));
    println!("mode    = {}", MODE.get(packed));
    println!("id      = {}", ID.get(packed));
    println!("enabled = {}\n", ENABLED.get(packed));

    // Part 3: typed flags
    let flags = RenderFlags::VISIBLE | RenderFlags::CAST_SHADOW;
    println!("has Visible?    {}", flags.has(RenderFlags::VISIBLE) as u8);
    println!("has Selected?   {}", flags.has(RenderFlags::SELECTED) as u8);
    println!("has CastShadow? {}\n", flags.has(RenderFlags::CAST_SHADOW) as u8);

    println!("Reminder: shifts of 32 or more select no bits here (mask_u32(32) = {})", bits::mask_u32(32));

    let u = reinterpret_i32(-1);
    println!("signed -1 as u32: {} (bin {})", u, format_bits(u, 16));

    println!("\nDone.");
}
