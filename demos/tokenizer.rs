//! Tokenizer Example - Typeahead over US states in raw mode
//!
//! - Type to filter, Enter or click a suggestion to select it
//! - Backspace on an empty field focuses the last token, Backspace again removes it
//! - Click a token's × to remove it
//! - Escape or Ctrl+C quits
//!
//! Run with: RUST_LOG=spark_tokenizer=debug cargo run --example tokenizer
//! Logs go to tokenizer.log; the terminal is busy drawing the UI.

use std::cell::RefCell;
use std::fs::File;
use std::io::{stdout, Write};
use std::rc::Rc;
use std::sync::Mutex;
use std::time::Duration;

use crossterm::{cursor, execute, queue, terminal};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use spark_tokenizer::state::input::{disable_mouse, enable_mouse};
use spark_tokenizer::{
    allocate_index, menu_item, on_keyboard, poll_event, render, route_event,
    ClickEvent, Element, Frame, InputEvent, KeyboardEvent, MenuItemProps, TokenizerInput,
    TokenizerInputProps,
};

const STATES: &[&str] = &[
    "Alabama", "Alaska", "Arizona", "Arkansas", "California", "Colorado", "Connecticut",
    "Delaware", "Florida", "Georgia", "Hawaii", "Idaho", "Illinois", "Indiana", "Iowa",
    "Kansas", "Kentucky", "Louisiana", "Maine", "Maryland", "Massachusetts", "Michigan",
    "Minnesota", "Mississippi", "Missouri", "Montana", "Nebraska", "Nevada", "New Hampshire",
    "New Jersey", "New Mexico", "New York", "North Carolina", "North Dakota", "Ohio",
    "Oklahoma", "Oregon", "Pennsylvania", "Rhode Island", "South Carolina", "South Dakota",
    "Tennessee", "Texas", "Utah", "Vermont", "Virginia", "Washington", "West Virginia",
    "Wisconsin", "Wyoming",
];

const MAX_RESULTS: usize = 5;

#[derive(Default)]
struct Demo {
    selected: Vec<Value>,
    value: String,
    active: usize,
    dirty: bool,
    quit: bool,
}

impl Demo {
    fn suggestions(&self) -> Vec<&'static str> {
        let query = self.value.to_lowercase();
        STATES
            .iter()
            .copied()
            .filter(|name| name.to_lowercase().starts_with(&query))
            .filter(|name| !self.selected.iter().any(|s| s["label"] == *name))
            .take(MAX_RESULTS)
            .collect()
    }

    fn select(&mut self, name: &str) {
        self.selected.push(json!({ "label": name }));
        self.value.clear();
        self.active = 0;
        self.dirty = true;
    }
}

fn props(demo: &Rc<RefCell<Demo>>) -> TokenizerInputProps<Value> {
    let snapshot = demo.borrow();
    let on_change = demo.clone();
    let on_remove = demo.clone();
    let on_key = demo.clone();
    TokenizerInputProps {
        id: Some("states".into()),
        selected: snapshot.selected.clone(),
        value: snapshot.value.clone(),
        placeholder: Some("Choose a state...".into()),
        on_change: Some(Rc::new(move |text: &str| {
            let mut demo = on_change.borrow_mut();
            demo.value = text.to_string();
            demo.active = 0;
            demo.dirty = true;
        })),
        on_remove: Some(Rc::new(move |entry: &Value| {
            let mut demo = on_remove.borrow_mut();
            demo.selected.retain(|s| s != entry);
            demo.dirty = true;
        })),
        on_key_down: Some(Rc::new(move |event: &KeyboardEvent| {
            let mut demo = on_key.borrow_mut();
            let count = demo.suggestions().len();
            match event.key.as_str() {
                "Enter" => {
                    if let Some(name) = demo.suggestions().get(demo.active).copied() {
                        demo.select(name);
                    }
                }
                "ArrowDown" if count > 0 => {
                    demo.active = (demo.active + 1) % count;
                    demo.dirty = true;
                }
                "ArrowUp" if count > 0 => {
                    demo.active = (demo.active + count - 1) % count;
                    demo.dirty = true;
                }
                _ => {}
            }
        })),
        ..Default::default()
    }
}

fn menu(demo: &Rc<RefCell<Demo>>) -> Vec<(Element, Frame)> {
    let (names, active) = {
        let snapshot = demo.borrow();
        (snapshot.suggestions(), snapshot.active)
    };
    names
        .into_iter()
        .enumerate()
        .map(|(position, name)| {
            let demo = demo.clone();
            let element = menu_item(MenuItemProps {
                index: Some(allocate_index(Some(format!("result-{position}").as_str()))),
                content: name.to_string(),
                active: position == active,
                on_click: Some(Rc::new(move |_: &ClickEvent| demo.borrow_mut().select(name))),
                ..Default::default()
            });
            let frame = render(&element, position as u16 + 1);
            (element, frame)
        })
        .collect()
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let demo = Rc::new(RefCell::new(Demo::default()));
    let tokenizer = TokenizerInput::new(props(&demo));

    // Backspace/Delete on a focused token removes it
    let _token_keys = {
        let demo = demo.clone();
        let tokenizer = tokenizer.clone();
        on_keyboard(move |event: &KeyboardEvent| {
            if event.key == "Escape" || (event.modifiers.ctrl && event.key == "c") {
                demo.borrow_mut().quit = true;
                return true;
            }
            if event.key != "Backspace" && event.key != "Delete" {
                return false;
            }
            // Target is where the key landed, before any focus transfer
            let Some(target) = event.target else {
                return false;
            };
            let Some(position) = tokenizer.focus_targets().iter().position(|&t| t == target) else {
                return false;
            };
            {
                let mut demo = demo.borrow_mut();
                if position < demo.selected.len() {
                    demo.selected.remove(position);
                    demo.dirty = true;
                }
            }
            tokenizer.focus();
            true
        })
    };

    tokenizer.focus();
    let mut out = stdout();
    execute!(out, terminal::Clear(terminal::ClearType::All), cursor::Hide)?;

    while !demo.borrow().quit {
        let dirty = std::mem::take(&mut demo.borrow_mut().dirty);
        if dirty {
            tokenizer.set_props(props(&demo));
        }

        let tree = tokenizer.render()?;
        let frame = render(&tree, 0);
        frame.write_to(&mut out)?;
        let results = menu(&demo);
        for (_, row) in &results {
            row.write_to(&mut out)?;
        }
        queue!(
            out,
            cursor::MoveTo(0, results.len() as u16 + 1),
            terminal::Clear(terminal::ClearType::FromCursorDown)
        )?;
        out.flush()?;

        let Some(event) = poll_event(Duration::from_millis(50))? else {
            continue;
        };
        let menu_row = match &event {
            InputEvent::Mouse(mouse) if mouse.y > 0 => Some(mouse.y as usize - 1),
            _ => None,
        };
        match menu_row {
            Some(position) => {
                if let Some((element, row)) = results.get(position) {
                    route_event(event, element, row);
                }
            }
            None => {
                route_event(event, &tree, &frame);
            }
        }
    }

    tokenizer.unmount();
    execute!(out, cursor::Show, terminal::Clear(terminal::ClearType::All), cursor::MoveTo(0, 0))?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(File::create("tokenizer.log")?))
        .with_ansi(false)
        .init();

    terminal::enable_raw_mode()?;
    enable_mouse()?;
    let result = run();
    disable_mouse()?;
    terminal::disable_raw_mode()?;
    result
}
