mod circuit;
mod config;
mod display;
mod draw;
mod editor;
mod layout;
mod node;
mod port;
mod registry;
mod session;
mod snap;
mod wire;
mod wiring;

use iced::widget::{button, canvas, column, row, text};
use iced::{Element, Length, Task, Theme};
use log::{debug, warn};

use config::{Config, ConfigError};
use editor::EditorMessage;
use node::PALETTE;
use session::{Mode, Session};

fn main() -> iced::Result {
    env_logger::init();

    iced::application(init, update, view)
        .title("Gator")
        .theme(theme)
        .antialiasing(true)
        .run()
}

fn theme(_state: &Gator) -> Theme {
    Theme::Dark
}

fn init() -> (Gator, Task<Message>) {
    let config = load_config();
    let session = Session::new(&config);
    (Gator { session }, Task::none())
}

fn load_config() -> Config {
    match Config::load() {
        Ok(config) => config,
        Err(ConfigError::Io { path, source }) if source.kind() == std::io::ErrorKind::NotFound => {
            debug!("No config at {}, writing defaults", path.display());
            let config = Config::default();
            if let Err(err) = config.save() {
                warn!("Could not write default config: {err}");
            }
            config
        }
        Err(err) => {
            warn!("{err}, using defaults");
            Config::default()
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    Editor(EditorMessage),
}

struct Gator {
    session: Session,
}

fn update(state: &mut Gator, message: Message) -> Task<Message> {
    match message {
        Message::Editor(msg) => state.session.update(msg),
    }
    Task::none()
}

fn view(state: &Gator) -> Element<'_, Message> {
    let current = state.session.mode();
    let mode_button = |label: &'static str, mode: Mode| {
        let style = if current == mode {
            button::primary
        } else {
            button::secondary
        };
        button(text(label))
            .style(style)
            .on_press(Message::Editor(EditorMessage::SetMode(mode)))
    };
    let gate_button = |tag: &'static str| {
        button(text(tag.to_uppercase()))
            .style(button::secondary)
            .on_press(Message::Editor(EditorMessage::AddGate(tag)))
    };

    let toolbar = row![
        mode_button("Edit", Mode::Edit),
        mode_button("Erase", Mode::Erase),
    ]
    .extend(PALETTE.into_iter().map(|tag| gate_button(tag).into()))
    .spacing(6)
    .padding(8);

    column![
        toolbar,
        canvas(&state.session)
            .width(Length::Fill)
            .height(Length::Fill),
    ]
    .into()
}
