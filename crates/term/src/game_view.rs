//! BoardView: maps a `core::BoardSnapshot` into a terminal framebuffer.
//!
//! Three panels side by side: the presented face at 2x1 cells, the whole
//! board unrolled into a strip at 1x1, and a HUD with totals and the recent
//! event feed. Pure (no I/O), so it can be unit-tested.

use crate::core::BoardSnapshot;
use crate::feed::EventFeed;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::PALETTE_SIZE;

const HUD_W: u16 = 18;
const GAP: u16 = 2;

const BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

const PALETTE: [Rgb; PALETTE_SIZE as usize] = [
    Rgb::new(220, 80, 80),
    Rgb::new(240, 160, 60),
    Rgb::new(240, 220, 80),
    Rgb::new(100, 220, 120),
    Rgb::new(80, 220, 220),
    Rgb::new(80, 120, 220),
    Rgb::new(200, 120, 220),
];

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Screen placement of each panel's frame (top-left corner of its border).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub face_x: u16,
    pub strip_x: Option<u16>,
    pub hud_x: Option<u16>,
    pub top: u16,
    pub face_w: u16,
    pub strip_w: u16,
    pub frame_h: u16,
}

#[derive(Debug, Clone, Copy)]
pub struct BoardView {
    /// Face cell width in terminal columns.
    cell_w: u16,
    anchor_y: AnchorY,
}

impl Default for BoardView {
    fn default() -> Self {
        // 2x1 offsets the usual glyph aspect ratio.
        Self {
            cell_w: 2,
            anchor_y: AnchorY::Center,
        }
    }
}

impl BoardView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            ..Self::default()
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Where the panels land for this board in this viewport. Panels that do
    /// not fit to the right of the face are left out.
    pub fn layout(&self, snap: &BoardSnapshot, viewport: Viewport) -> Layout {
        let face_w = snap.side_width as u16 * self.cell_w + 2;
        let strip_w = snap.board_width as u16 + 2;
        let frame_h = snap.board_height as u16 + 2;

        let with_strip = face_w + GAP + strip_w;
        let (total, show_strip) = if with_strip + GAP + HUD_W <= viewport.width {
            (with_strip + GAP + HUD_W, true)
        } else if with_strip <= viewport.width {
            (with_strip, true)
        } else {
            (face_w + GAP + HUD_W, false)
        };

        let face_x = viewport.width.saturating_sub(total) / 2;
        let strip_x = show_strip.then_some(face_x + face_w + GAP);
        let after = strip_x.map_or(face_x + face_w, |x| x + strip_w) + GAP;
        let hud_x = (after + HUD_W <= viewport.width).then_some(after);

        // One title row above the frames.
        let top = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h + 1) / 2 + 1,
            AnchorY::Top => 1,
        };

        Layout {
            face_x,
            strip_x,
            hud_x,
            top,
            face_w,
            strip_w,
            frame_h,
        }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        snap: &BoardSnapshot,
        feed: &EventFeed,
        paused: bool,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));
        if snap.board_width == 0 {
            return;
        }

        let layout = self.layout(snap, viewport);
        self.draw_face(fb, snap, &layout);
        if let Some(x) = layout.strip_x {
            self.draw_strip(fb, snap, &layout, x);
        }
        if let Some(x) = layout.hud_x {
            draw_hud(fb, snap, feed, &layout, x, viewport.height);
        }

        if snap.topped_out {
            self.draw_overlay_text(fb, &layout, "TOPPED OUT");
        } else if paused {
            self.draw_overlay_text(fb, &layout, "PAUSED");
        }
    }

    pub fn render(&self, snap: &BoardSnapshot, feed: &EventFeed, paused: bool, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, feed, paused, viewport, &mut fb);
        fb
    }

    fn draw_face(&self, fb: &mut FrameBuffer, snap: &BoardSnapshot, layout: &Layout) {
        let side = snap.side_width as i32;
        let height = snap.board_height as u16;
        let face = snap.active_face;
        let (x0, y0) = (layout.face_x, layout.top);

        let title = CellStyle::default().bold();
        let mut tx = x0 + fb.put_str(x0, y0 - 1, "FACE ", title);
        tx += fb.put_u32(tx, y0 - 1, face as u32, title);
        if snap.target_face != face {
            tx += fb.put_str(tx, y0 - 1, " > ", title);
            fb.put_u32(tx, y0 - 1, snap.target_face as u32, title);
        }

        fb.fill_rect(x0 + 1, y0 + 1, layout.face_w - 2, height, ' ', CellStyle::new(BG, BG));
        fb.draw_box(x0, y0, layout.face_w, layout.frame_h, CellStyle::default());

        for fy in 0..snap.board_height as i32 {
            for fx in 0..side {
                match snap.face_cell(face, fx, fy) {
                    0 => self.face_cell(fb, layout, height, fx, fy, '·', empty_style()),
                    code => self.face_cell(fb, layout, height, fx, fy, '█', cube_style(code - 1)),
                }
            }
        }

        if let Some(piece) = snap.piece {
            let style = cube_style(piece.palette).bold();
            for &(fx, fy) in &piece.cells {
                if (0..side).contains(&fx) && (0..snap.board_height as i32).contains(&fy) {
                    self.face_cell(fb, layout, height, fx, fy, '█', style);
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn face_cell(
        &self,
        fb: &mut FrameBuffer,
        layout: &Layout,
        height: u16,
        fx: i32,
        fy: i32,
        ch: char,
        style: CellStyle,
    ) {
        let px = layout.face_x + 1 + fx as u16 * self.cell_w;
        let py = layout.top + 1 + (height - 1 - fy as u16);
        fb.fill_rect(px, py, self.cell_w, 1, ch, style);
    }

    fn draw_strip(&self, fb: &mut FrameBuffer, snap: &BoardSnapshot, layout: &Layout, x0: u16) {
        let y0 = layout.top;
        let height = snap.board_height as u16;
        fb.put_str(x0, y0 - 1, "BOARD", CellStyle::default().bold());
        fb.draw_box(x0, y0, layout.strip_w, layout.frame_h, CellStyle::default());

        let stride = snap.side_width.saturating_sub(1).max(1);
        let face_start = snap.active_face * stride;
        let on_face = |x: usize| {
            let rel = (x + snap.board_width - face_start % snap.board_width) % snap.board_width;
            rel < snap.side_width
        };

        for y in 0..snap.board_height {
            let py = y0 + 1 + (height - 1 - y as u16);
            for x in 0..snap.board_width {
                let px = x0 + 1 + x as u16;
                let bg = if on_face(x) { Rgb::new(45, 45, 60) } else { BG };
                match snap.cell(x, y) {
                    0 => fb.put_char(px, py, '·', CellStyle { bg, ..empty_style() }),
                    code => fb.put_char(px, py, '█', CellStyle { bg, ..cube_style(code - 1) }),
                }
            }
        }

        if let Some(piece) = snap.piece {
            let style = cube_style(piece.palette).bold();
            for &(fx, fy) in &piece.cells {
                if !(0..snap.board_height as i32).contains(&fy) {
                    continue;
                }
                let x = (face_start as i64 + fx as i64).rem_euclid(snap.board_width as i64) as u16;
                let py = y0 + 1 + (height - 1 - fy as u16);
                fb.put_char(x0 + 1 + x, py, '█', style);
            }
        }
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, layout: &Layout, text: &str) {
        let mid_y = layout.top + layout.frame_h / 2;
        let text_w = text.chars().count() as u16;
        let x = layout.face_x + layout.face_w.saturating_sub(text_w) / 2;
        let style = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();
        fb.put_str(x, mid_y, text, style);
    }
}

fn draw_hud(fb: &mut FrameBuffer, snap: &BoardSnapshot, feed: &EventFeed, layout: &Layout, x: u16, max_y: u16) {
    let label = CellStyle::default().bold();
    let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
    let dim = value.dim();

    let mut y = layout.top;
    let mut row = |fb: &mut FrameBuffer, name: &str, n: u32| {
        if y < max_y {
            fb.put_str(x, y, name, label);
            fb.put_u32(x + 8, y, n, value);
        }
        y += 1;
    };
    row(fb, "LINES", snap.totals.lines);
    row(fb, "PIECES", snap.totals.pieces);
    row(fb, "BAD", snap.totals.bad_moves);
    row(fb, "FLYING", snap.ejected as u32);
    row(fb, "ANGLE", snap.angle.round().rem_euclid(360.0) as u32);

    let mut y = layout.top + 6;
    if let Some(piece) = snap.piece {
        let n = fb.put_str(x, y, "PIECE ", label);
        let n = n + fb.put_str(x + n, y, piece.style, value);
        if piece.dropping {
            fb.put_str(x + n + 1, y, "drop", dim);
        }
    }
    y += 2;

    if y >= max_y {
        return;
    }
    fb.put_str(x, y, "EVENTS", label);
    y += 1;
    for entry in feed.recent() {
        if y >= max_y {
            break;
        }
        let mut cx = x + fb.put_str(x, y, entry.cue, value);
        match (entry.cue, entry.detail) {
            ("line", Some(rows)) => {
                cx += fb.put_str(cx, y, " +", dim);
                cx += fb.put_u32(cx, y, rows, dim);
            }
            ("piece", Some(1)) => cx += fb.put_str(cx, y, " bad", dim),
            _ => {}
        }
        if entry.count > 1 {
            cx += fb.put_str(cx, y, " x", dim);
            fb.put_u32(cx, y, entry.count, dim);
        }
        y += 1;
    }
}

fn cube_style(palette: u8) -> CellStyle {
    let fg = PALETTE[(palette % PALETTE_SIZE) as usize];
    CellStyle::new(fg, BG)
}

fn empty_style() -> CellStyle {
    CellStyle::new(Rgb::new(90, 90, 100), BG).dim()
}
