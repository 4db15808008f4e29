//! Interactive quick view.
//!
//! Reads one command per line from stdin while the controller's load and
//! timer completions arrive on its event channel. Both sources are polled
//! from a single task, so every state change happens in order.

use std::sync::{Arc, Mutex, PoisonError};

use quickview_core::AppConfig;
use quickview_session::{
    CtaTimings, Document, ElementId, EventOutcome, HeadlessDocument, Key, PanelBody,
    PickOutcome, ProductGrid, ProductLoader, QuickViewController, QuickViewState,
};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ReplCommand {
    Open(String),
    Pick { option: String, value: String },
    Add,
    Close,
    Key(Key),
    Show,
    Help,
    Quit,
}

pub(crate) const HELP: &str = "\
commands:
  pick <Option>=<Value>   select an option value, e.g. pick Color=Red
  add                     add the resolved variant to the bag
  open <handle>           open (or switch to) a product
  close                   close the quick view
  tab | shift-tab | esc   keyboard input
  show                    print the current state
  quit                    exit";

pub(crate) fn parse_command(line: &str) -> Result<ReplCommand, String> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(w, r)| (w, r.trim()));

    match word.to_ascii_lowercase().as_str() {
        "open" if !rest.is_empty() => Ok(ReplCommand::Open(rest.to_owned())),
        "open" => Err("usage: open <handle>".to_owned()),
        "pick" => {
            let (option, value) = rest
                .split_once('=')
                .map(|(o, v)| (o.trim(), v.trim()))
                .filter(|(o, v)| !o.is_empty() && !v.is_empty())
                .ok_or_else(|| "usage: pick <Option>=<Value>".to_owned())?;
            Ok(ReplCommand::Pick {
                option: option.to_owned(),
                value: value.to_owned(),
            })
        }
        "add" => Ok(ReplCommand::Add),
        "close" => Ok(ReplCommand::Close),
        "tab" => Ok(ReplCommand::Key(Key::Tab)),
        "shift-tab" => Ok(ReplCommand::Key(Key::ShiftTab)),
        "esc" | "escape" => Ok(ReplCommand::Key(Key::Escape)),
        "" | "show" => Ok(ReplCommand::Show),
        "help" | "?" => Ok(ReplCommand::Help),
        "quit" | "exit" | "q" => Ok(ReplCommand::Quit),
        other => Err(format!("unknown command '{other}' (try 'help')")),
    }
}

/// Renders the overlay as plain text.
pub(crate) fn render(state: &QuickViewState, focused: Option<&ElementId>) -> String {
    let mut out = String::new();
    if !state.is_open {
        out.push_str("[quick view closed]\n");
        if let Some(el) = focused {
            out.push_str(&format!("focus: {el}\n"));
        }
        return out;
    }

    match &state.body {
        PanelBody::Hidden => {}
        PanelBody::Loading => out.push_str("Loading...\n"),
        PanelBody::Error { message } => out.push_str(&format!("{message}\n")),
        PanelBody::Product(view) => {
            out.push_str(&format!("== {} ==\n", view.title));
            if !view.description.is_empty() {
                out.push_str(&format!("{}\n", view.description));
            }
            match &view.image {
                Some(img) => out.push_str(&format!("image: {}\n", img.url)),
                None => out.push_str("image: (placeholder)\n"),
            }
            out.push_str(&format!("price: {}\n", view.price));
            for option in &view.options {
                let values: Vec<String> = option
                    .values
                    .iter()
                    .map(|v| match (v.selected, v.enabled) {
                        (true, _) => format!("[{}]", v.value),
                        (false, true) => v.value.clone(),
                        (false, false) => format!("({} n/a)", v.value),
                    })
                    .collect();
                out.push_str(&format!("{}: {}\n", option.name, values.join(" ")));
            }
            let availability = if state.cta.enabled { "" } else { " (disabled)" };
            out.push_str(&format!("button: {}{availability}\n", state.cta.label));
        }
    }

    if let Some(el) = focused {
        out.push_str(&format!("focus: {el}\n"));
    }
    out
}

pub(crate) async fn run_quick_view(
    config: &AppConfig,
    loader: Arc<dyn ProductLoader>,
    handle: &str,
) -> anyhow::Result<()> {
    let document = Arc::new(Mutex::new(HeadlessDocument::new()));
    {
        let trigger = ElementId(ProductGrid::trigger_id(handle));
        let mut page = document.lock().unwrap_or_else(PoisonError::into_inner);
        page.insert(trigger.clone(), None, true);
        page.focus(&trigger);
    }

    let (mut controller, mut events) =
        QuickViewController::new(loader, Arc::clone(&document), CtaTimings::from(config));

    let focused = || {
        document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .active_element()
    };

    println!("{HELP}\n");
    controller.open(handle);
    print!("{}", render(&controller.state(), focused().as_ref()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = match parse_command(&line) {
                    Ok(command) => command,
                    Err(message) => {
                        eprintln!("{message}");
                        continue;
                    }
                };
                if command == ReplCommand::Quit {
                    break;
                }
                if let Some(note) = execute(&mut controller, command) {
                    println!("{note}");
                }
            }
            Some(event) = events.recv() => {
                if controller.apply(event) == EventOutcome::Stale {
                    continue;
                }
            }
        }
        print!("{}", render(&controller.state(), focused().as_ref()));
    }

    controller.close();
    Ok(())
}

/// Runs one command; returns a note to print when the command did nothing.
fn execute<D: Document>(
    controller: &mut QuickViewController<D>,
    command: ReplCommand,
) -> Option<String> {
    match command {
        ReplCommand::Open(handle) => {
            controller.open(&handle);
            None
        }
        ReplCommand::Pick { option, value } => match controller.pick(&option, &value) {
            PickOutcome::Applied => None,
            outcome => Some(format!("pick ignored: {outcome:?}")),
        },
        ReplCommand::Add => (!controller.add_to_bag())
            .then(|| "nothing to add: select an available combination first".to_owned()),
        ReplCommand::Close => {
            controller.close();
            None
        }
        ReplCommand::Key(key) => (!controller.handle_key(key)).then(|| "key ignored".to_owned()),
        ReplCommand::Help => Some(HELP.to_owned()),
        ReplCommand::Show | ReplCommand::Quit => None,
    }
}
