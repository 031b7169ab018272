//! Session actions and their text form.
//!
//! One action per line. Items are referred to by the order they were added
//! in, starting at 0. Blank lines and lines starting with `#` are ignored.

use kurbo::{Point, Size, Vec2};
use snapcanvas_core::SnapMode;
use std::str::FromStr;
use thiserror::Error;

/// Errors from parsing an action line.
#[derive(Debug, Error, PartialEq)]
pub enum ActionError {
    #[error("unknown action: {0}")]
    Unknown(String),
    #[error("{action} expects {expected} arguments, got {got}")]
    Arity {
        action: &'static str,
        expected: &'static str,
        got: usize,
    },
    #[error("invalid number: {0}")]
    Number(String),
    #[error("invalid snap mode: {0}")]
    Mode(String),
}

/// An action applied to a session, mirroring what the gesture and toolbar
/// glue of an interactive frontend would send.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// Add an item centered at `position`. Without a size the default is used.
    Add { position: Point, size: Option<Size> },
    /// Add an image item fitted into the default item size.
    Image {
        label: String,
        pixels: (u32, u32),
        position: Point,
    },
    Begin(usize),
    /// Propose a new center for an item.
    Move(usize, Point),
    /// Propose a new size for an item.
    Resize(usize, Size),
    Pan(usize, Vec2),
    Pinch(usize, f64),
    End(usize),
    Cancel(usize),
    Remove(usize),
    Undo,
    Redo,
    Grid(u32),
    Threshold(f64),
    GridThreshold(f64),
    Mode(SnapMode),
    HistoryLimit(usize),
    CanvasSize(Size),
}

/// Help text for every action, as (usage, description).
pub const ACTION_HELP: &[(&str, &str)] = &[
    ("add X Y [W H]", "Add an item centered at X,Y"),
    ("image LABEL PW PH X Y", "Add a PWxPH pixel image centered at X,Y"),
    ("begin N", "Start a gesture on item N"),
    ("move N X Y", "Propose a new center for item N"),
    ("resize N W H", "Propose a new size for item N"),
    ("pan N DX DY", "Drag item N by a gesture delta"),
    ("pinch N S", "Scale item N by a gesture factor"),
    ("end N", "Finish the gesture on item N"),
    ("cancel N", "Abort the gesture on item N"),
    ("remove N", "Delete item N"),
    ("undo", "Undo the last change"),
    ("redo", "Redo the last undone change"),
    ("grid N", "Use N interior grid lines"),
    ("threshold T", "Set every snap threshold"),
    ("grid-threshold T", "Set the grid snap threshold"),
    ("mode none|grid|items|all", "Choose snap targets"),
    ("history N", "Keep at most N undo entries"),
    ("canvas W H", "Resize the canvas"),
];

fn number<T: FromStr>(s: &str) -> Result<T, ActionError> {
    s.parse().map_err(|_| ActionError::Number(s.to_string()))
}

fn point(x: &str, y: &str) -> Result<Point, ActionError> {
    Ok(Point::new(number(x)?, number(y)?))
}

fn arity(action: &'static str, expected: &'static str, args: &[&str], allowed: &[usize]) -> Result<(), ActionError> {
    if allowed.contains(&args.len()) {
        Ok(())
    } else {
        Err(ActionError::Arity {
            action,
            expected,
            got: args.len(),
        })
    }
}

fn snap_mode(s: &str) -> Result<SnapMode, ActionError> {
    match s.to_ascii_lowercase().as_str() {
        "none" => Ok(SnapMode::None),
        "grid" => Ok(SnapMode::Grid),
        "items" => Ok(SnapMode::Items),
        "all" => Ok(SnapMode::All),
        _ => Err(ActionError::Mode(s.to_string())),
    }
}

impl FromStr for SessionAction {
    type Err = ActionError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();

        let action = match name {
            "add" => {
                arity("add", "2 or 4", &args, &[2, 4])?;
                let size = match args.len() {
                    4 => Some(Size::new(number(args[2])?, number(args[3])?)),
                    _ => None,
                };
                SessionAction::Add {
                    position: point(args[0], args[1])?,
                    size,
                }
            }
            "image" => {
                arity("image", "5", &args, &[5])?;
                SessionAction::Image {
                    label: args[0].to_string(),
                    pixels: (number(args[1])?, number(args[2])?),
                    position: point(args[3], args[4])?,
                }
            }
            "begin" => {
                arity("begin", "1", &args, &[1])?;
                SessionAction::Begin(number(args[0])?)
            }
            "move" => {
                arity("move", "3", &args, &[3])?;
                SessionAction::Move(number(args[0])?, point(args[1], args[2])?)
            }
            "resize" => {
                arity("resize", "3", &args, &[3])?;
                SessionAction::Resize(number(args[0])?, Size::new(number(args[1])?, number(args[2])?))
            }
            "pan" => {
                arity("pan", "3", &args, &[3])?;
                SessionAction::Pan(number(args[0])?, Vec2::new(number(args[1])?, number(args[2])?))
            }
            "pinch" => {
                arity("pinch", "2", &args, &[2])?;
                SessionAction::Pinch(number(args[0])?, number(args[1])?)
            }
            "end" => {
                arity("end", "1", &args, &[1])?;
                SessionAction::End(number(args[0])?)
            }
            "cancel" => {
                arity("cancel", "1", &args, &[1])?;
                SessionAction::Cancel(number(args[0])?)
            }
            "remove" => {
                arity("remove", "1", &args, &[1])?;
                SessionAction::Remove(number(args[0])?)
            }
            "undo" => {
                arity("undo", "0", &args, &[0])?;
                SessionAction::Undo
            }
            "redo" => {
                arity("redo", "0", &args, &[0])?;
                SessionAction::Redo
            }
            "grid" => {
                arity("grid", "1", &args, &[1])?;
                SessionAction::Grid(number(args[0])?)
            }
            "threshold" => {
                arity("threshold", "1", &args, &[1])?;
                SessionAction::Threshold(number(args[0])?)
            }
            "grid-threshold" => {
                arity("grid-threshold", "1", &args, &[1])?;
                SessionAction::GridThreshold(number(args[0])?)
            }
            "mode" => {
                arity("mode", "1", &args, &[1])?;
                SessionAction::Mode(snap_mode(args[0])?)
            }
            "history" => {
                arity("history", "1", &args, &[1])?;
                SessionAction::HistoryLimit(number(args[0])?)
            }
            "canvas" => {
                arity("canvas", "2", &args, &[2])?;
                SessionAction::CanvasSize(Size::new(number(args[0])?, number(args[1])?))
            }
            other => return Err(ActionError::Unknown(other.to_string())),
        };
        Ok(action)
    }
}

/// Print the action reference to the console.
pub fn print_help() {
    println!("\n=== Session actions ===");
    for (usage, description) in ACTION_HELP {
        println!("  {:26} {}", usage, description);
    }
    println!();
}
