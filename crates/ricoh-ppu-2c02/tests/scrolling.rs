//! Scroll registers driving a rendered frame: fine and coarse X, the
//! horizontal reload at dot 257 and the vertical reload on the
//! pre-render line.

use emu_core::{Observable, Value};
use ricoh_ppu_2c02::{FB_WIDTH, NTSC_PALETTE, PRE_RENDER_SCANLINE, Ppu, VIDEO_MEMORY_SIZE};

const BACKDROP: u8 = 0x0F;
const BG_COLOUR: u8 = 0x16;

/// Nametable x of the one-pixel vertical stripe.
const STRIPE_X: usize = 32;
/// Nametable y of the one-pixel horizontal stripe.
const STRIPE_Y: usize = 80;

/// Tile 2 lights only its left column, tile 3 only its top row. Column 4
/// of nametable 0 is tile 2; row 10 is tile 3 everywhere else.
fn video_memory() -> Vec<u8> {
    let mut vram = vec![0; VIDEO_MEMORY_SIZE];
    vram[0x0020..0x0028].fill(0x80);
    vram[0x0030] = 0xFF;
    for row in 0..30 {
        for col in 0..32 {
            let tile = if col == STRIPE_X / 8 {
                2
            } else if row == STRIPE_Y / 8 {
                3
            } else {
                0
            };
            vram[0x2000 + row * 32 + col] = tile;
        }
    }
    vram[0x3F00] = BACKDROP;
    vram[0x3F01] = BG_COLOUR;
    vram
}

fn run_to(ppu: &mut Ppu, frame: u64, scanline: u16, dot: u16) {
    while (ppu.frame(), ppu.scanline(), ppu.dot()) != (frame, scanline, dot) {
        ppu.tick();
    }
}

fn lit(ppu: &Ppu, x: usize, y: usize) -> bool {
    let colour = ppu.framebuffer()[y * FB_WIDTH as usize + x];
    if colour == NTSC_PALETTE[usize::from(BG_COLOUR)] {
        true
    } else {
        assert_eq!(colour, NTSC_PALETTE[usize::from(BACKDROP)], "pixel ({x},{y})");
        false
    }
}

fn v(ppu: &Ppu) -> Value {
    ppu.query("v").expect("v is observable")
}

/// Scroll (11, 5): coarse X 1, fine X 3, fine Y 5.
fn scrolled() -> Ppu {
    let mut ppu = Ppu::new(video_memory(), &NTSC_PALETTE).expect("valid ppu");
    ppu.write_register(0x2005, 11);
    ppu.write_register(0x2005, 5);
    ppu.write_register(0x2001, 0x0A);
    ppu
}

#[test]
fn fine_and_coarse_scroll_shift_the_picture() {
    let mut ppu = scrolled();
    run_to(&mut ppu, 2, 0, 0);

    for y in [0, 40, 150, 220] {
        assert!(lit(&ppu, STRIPE_X - 11, y), "stripe at line {y}");
        assert!(!lit(&ppu, STRIPE_X - 12, y));
        assert!(!lit(&ppu, STRIPE_X - 10, y));
    }
    for x in [0, 100, 200] {
        assert!(lit(&ppu, x, STRIPE_Y - 5), "row at column {x}");
        assert!(!lit(&ppu, x, STRIPE_Y - 6));
        assert!(!lit(&ppu, x, STRIPE_Y - 4));
    }
}

#[test]
fn dot_257_restores_horizontal_position() {
    let mut ppu = scrolled();
    run_to(&mut ppu, 1, 10, 257);
    // 34 coarse X increments since the last reload: 1 -> 3 in the next
    // nametable.
    assert_eq!(v(&ppu), Value::U16(0x0443));

    run_to(&mut ppu, 1, 10, 258);
    // Coarse X 1 from t; eleven Y increments on 5 give coarse Y 2, fine Y 0.
    assert_eq!(v(&ppu), Value::U16(0x0041));
}

#[test]
fn mid_frame_scroll_write_lands_on_later_lines() {
    let mut ppu = scrolled();
    run_to(&mut ppu, 1, 100, 300);
    let _ = ppu.read_register(0x2002);
    ppu.write_register(0x2005, 16);
    ppu.write_register(0x2005, 0);

    // Vertical bits wait for the pre-render line.
    run_to(&mut ppu, 1, PRE_RENDER_SCANLINE, 280);
    assert_ne!(v(&ppu), Value::U16(0x0002));
    run_to(&mut ppu, 1, PRE_RENDER_SCANLINE, 305);
    assert_eq!(v(&ppu), Value::U16(0x0002));

    run_to(&mut ppu, 2, 0, 0);
    // Lines up to the write keep the old scroll.
    assert!(lit(&ppu, STRIPE_X - 11, 100));
    // Line 101 was prefetched with the old coarse X but uses the new fine X.
    assert!(lit(&ppu, STRIPE_X - 8, 101));
    // From line 102 both halves of the new horizontal scroll apply.
    assert!(lit(&ppu, STRIPE_X - 16, 102));
    assert!(lit(&ppu, STRIPE_X - 16, 200));
    assert!(!lit(&ppu, STRIPE_X - 11, 200));

    run_to(&mut ppu, 3, 0, 0);
    assert!(lit(&ppu, STRIPE_X - 16, 40));
    assert!(lit(&ppu, 100, STRIPE_Y));
    assert!(!lit(&ppu, 100, STRIPE_Y - 5));
}
