// Copyright 2025-2026, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE.md

use std::fmt::{self, Display};

pub const BLUE: &str = "\x1b[34;1m";
pub const MINT: &str = "\x1b[38;5;48;1m";
pub const RED: &str = "\x1b[31;1m";
pub const CLEAR: &str = "\x1b[0;0m";
pub const YELLOW: &str = "\x1b[33;1m";

pub trait Color {
    fn color(&self, color: &str) -> String;

    fn blue(&self) -> String;
    fn mint(&self) -> String;
    fn red(&self) -> String;
    fn yellow(&self) -> String;
}

#[rustfmt::skip]
impl<T> Color for T where T: Display {

    fn color(&self, color: &str) -> String {
        format!("{}{}{}", color, self, CLEAR)
    }

    fn blue(&self)   -> String { self.color(BLUE)   }
    fn mint(&self)   -> String { self.color(MINT)   }
    fn red(&self)    -> String { self.color(RED)    }
    fn yellow(&self) -> String { self.color(YELLOW) }
}

/// Console prefix used on every harness status line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    /// `[*]` work about to happen
    Step,
    /// `[+]` work that finished
    Done,
    /// `[!]` a failure the sweep recovered from
    Fail,
}

impl Marker {
    pub fn text(self) -> &'static str {
        match self {
            Marker::Step => "[*]",
            Marker::Done => "[+]",
            Marker::Fail => "[!]",
        }
    }

    /// Prefixes `message` with the coloured marker.
    pub fn line<T: Display>(self, message: T) -> String {
        let marker = match self {
            Marker::Step => self.text().blue(),
            Marker::Done => self.text().mint(),
            Marker::Fail => self.text().red(),
        };
        format!("{marker} {message}")
    }
}

impl Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

pub fn when<T: Display>(cond: bool, text: T, when_color: &str) -> String {
    match cond {
        true => text.color(when_color),
        false => format!("{text}"),
    }
}
