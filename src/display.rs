use anyhow::Result;
use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdout, Write};

use crate::bitboard::StoneSet;
use crate::{HEIGHT, WIDTH};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Cell {
    Black,
    White,
    Empty,
}

pub fn cell(black: StoneSet, white: StoneSet, column: usize, row: usize) -> Cell {
    let bit = 1 << (column * (HEIGHT + 1) + row);
    if black & bit != 0 {
        Cell::Black
    } else if white & bit != 0 {
        Cell::White
    } else {
        Cell::Empty
    }
}

/// Plain text picture of the board, top row first
pub fn render(black: StoneSet, white: StoneSet) -> String {
    let mut text = String::with_capacity((WIDTH + 1) * HEIGHT);
    for row in (0..HEIGHT).rev() {
        for column in 0..WIDTH {
            text.push(match cell(black, white, column, row) {
                Cell::Black => 'o',
                Cell::White => 'x',
                Cell::Empty => '-',
            });
        }
        text.push('\n');
    }
    text
}

/// Draws the board in colour on stdout, column numbers on top
pub fn display(black: StoneSet, white: StoneSet) -> Result<()> {
    let mut stdout = stdout();

    let cols: String = (0..WIDTH).map(|x| x.to_string()).collect();
    stdout.queue(PrintStyledContent(style(cols + "\n")))?;

    for row in (0..HEIGHT).rev() {
        for column in 0..WIDTH {
            stdout.queue(PrintStyledContent(
                style("O")
                    .attribute(Attribute::Bold)
                    .on(Color::DarkBlue)
                    .with(match cell(black, white, column, row) {
                        Cell::Black => Color::Red,
                        Cell::White => Color::Yellow,
                        Cell::Empty => Color::DarkBlue,
                    }),
            ))?;
        }
        stdout.queue(PrintStyledContent(style("\n")))?;
    }
    stdout.flush()?;
    Ok(())
}
