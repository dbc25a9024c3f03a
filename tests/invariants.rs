//! Property tests: the grid invariants hold after any well-formed
//! command sequence, and the viewport offset never escapes history.

use proptest::prelude::*;

use vtscreen::{
    CharStyle, Color, Command, Mode, Screen, ScreenConfig, ScreenHooks, TabClear, WindowSize,
};

fn mode_strategy() -> impl Strategy<Value = Mode> {
    prop_oneof![
        Just(Mode::Insert),
        Just(Mode::AutomaticNewLine),
        Just(Mode::Origin),
        Just(Mode::AutoWrap),
        Just(Mode::VisibleCursor),
        Just(Mode::LeftRightMargin),
        Just(Mode::BracketedPaste),
        Just(Mode::UseAlternateScreen),
    ]
}

fn text_commands() -> impl Strategy<Value = Command> {
    prop_oneof![
        proptest::char::range('a', 'z').prop_map(Command::AppendChar),
        Just(Command::AppendChar('中')),
        Just(Command::AppendChar('\u{0301}')),
        Just(Command::AppendChar('\u{1F600}')),
        Just(Command::AppendChar('\u{FE0F}')),
        Just(Command::Linefeed),
        Just(Command::CarriageReturn),
        Just(Command::Backspace),
    ]
}

fn motion_commands() -> impl Strategy<Value = Command> {
    prop_oneof![
        (0usize..50).prop_map(Command::MoveCursorUp),
        (0usize..50).prop_map(Command::MoveCursorDown),
        (0usize..50).prop_map(Command::MoveCursorForward),
        (0usize..50).prop_map(Command::MoveCursorBackward),
        (0usize..40, 0usize..40)
            .prop_map(|(row, column)| Command::MoveCursorTo { row, column }),
        (0usize..40).prop_map(Command::MoveCursorToColumn),
        (0usize..40).prop_map(Command::MoveCursorToLine),
        (1usize..5).prop_map(Command::MoveCursorToNextTab),
        (1usize..5).prop_map(Command::CursorBackwardTab),
    ]
}

fn index_commands() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::Index),
        Just(Command::ReverseIndex),
        Just(Command::BackIndex),
        Just(Command::ForwardIndex),
        Just(Command::NextLine),
        Just(Command::HorizontalTabSet),
        Just(Command::HorizontalTabClear(TabClear::UnderCursor)),
        Just(Command::ScreenAlignmentPattern),
        Just(Command::SaveCursor),
        Just(Command::RestoreCursor),
    ]
}

fn erase_commands() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::ClearToEndOfScreen),
        Just(Command::ClearToBeginOfScreen),
        Just(Command::ClearScreen),
        Just(Command::ClearToEndOfLine),
        Just(Command::ClearToBeginOfLine),
        Just(Command::ClearLine),
        (0usize..60).prop_map(Command::EraseCharacters),
        Just(Command::ClearScrollbackBuffer),
    ]
}

fn scroll_commands() -> impl Strategy<Value = Command> {
    prop_oneof![
        (0usize..30).prop_map(Command::ScrollUp),
        (0usize..30).prop_map(Command::ScrollDown),
        (0usize..30).prop_map(Command::InsertLines),
        (0usize..30).prop_map(Command::DeleteLines),
        (0usize..30).prop_map(Command::InsertCharacters),
        (0usize..30).prop_map(Command::DeleteCharacters),
        (0usize..30).prop_map(Command::InsertColumns),
        (0usize..30).prop_map(Command::DeleteColumns),
    ]
}

fn state_commands() -> impl Strategy<Value = Command> {
    prop_oneof![
        (
            proptest::option::of(0usize..40),
            proptest::option::of(0usize..40)
        )
            .prop_map(|(top, bottom)| Command::SetTopBottomMargin { top, bottom }),
        (
            proptest::option::of(0usize..40),
            proptest::option::of(0usize..40)
        )
            .prop_map(|(left, right)| Command::SetLeftRightMargin { left, right }),
        (mode_strategy(), any::<bool>())
            .prop_map(|(mode, enable)| Command::SetMode { mode, enable }),
        mode_strategy().prop_map(|m| Command::SaveModes(vec![m])),
        mode_strategy().prop_map(|m| Command::RestoreModes(vec![m])),
        any::<u8>().prop_map(|i| Command::SetForegroundColor(Color::Palette(i))),
        any::<u8>().prop_map(|i| Command::SetBackgroundColor(Color::Palette(i))),
        Just(Command::SetStyle {
            styles: CharStyle::BOLD | CharStyle::UNDERLINE,
            enable: true,
        }),
        Just(Command::ResetGraphicsRendition),
        Just(Command::SetMark),
    ]
}

fn reset_commands() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::SoftReset),
        Just(Command::FullReset),
        Just(Command::Hyperlink {
            id: None,
            uri: "https://example.com".to_owned(),
        }),
        Just(Command::Hyperlink {
            id: None,
            uri: String::new(),
        }),
    ]
}

fn command_strategy() -> impl Strategy<Value = Command> {
    prop_oneof![
        4 => text_commands(),
        2 => motion_commands(),
        1 => index_commands(),
        1 => erase_commands(),
        1 => scroll_commands(),
        1 => state_commands(),
        1 => reset_commands(),
    ]
}

fn test_screen() -> Screen {
    let config = ScreenConfig {
        size: WindowSize::new(20, 6),
        max_history_line_count: Some(50),
        ..ScreenConfig::default()
    };
    Screen::with_config(config, ScreenHooks::default())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn invariants_hold_after_any_command_sequence(
        commands in proptest::collection::vec(command_strategy(), 0..150)
    ) {
        let mut screen = test_screen();
        for command in commands {
            screen.apply(command);
        }
        prop_assert!(screen.buffer().verify_state().is_ok());
        prop_assert!(screen.scroll_offset() <= screen.history_line_count());
    }

    #[test]
    fn invariants_hold_across_resize(
        commands in proptest::collection::vec(command_strategy(), 0..80),
        columns in 1usize..40,
        rows in 1usize..16,
    ) {
        let mut screen = test_screen();
        for command in commands {
            screen.apply(command);
        }
        screen.resize(WindowSize::new(columns, rows));
        prop_assert!(screen.buffer().verify_state().is_ok());
        prop_assert_eq!(screen.size(), WindowSize::new(columns, rows));
    }

    #[test]
    fn viewport_offset_stays_clamped(
        commands in proptest::collection::vec(command_strategy(), 0..60),
        scrolls in proptest::collection::vec((0usize..30, any::<bool>()), 0..20),
    ) {
        let mut screen = test_screen();
        for command in commands {
            screen.apply(command);
        }
        for (lines, up) in scrolls {
            if up {
                screen.scroll_up(lines);
            } else {
                screen.scroll_down(lines);
            }
            prop_assert!(screen.scroll_offset() <= screen.history_line_count());
        }
    }

    #[test]
    fn plain_ascii_renders_back(
        text in proptest::collection::vec("[ -~]{0,19}", 1..5)
    ) {
        let mut screen = test_screen();
        for (i, line) in text.iter().enumerate() {
            if i > 0 {
                screen.apply(Command::CarriageReturn);
                screen.apply(Command::Linefeed);
            }
            for ch in line.chars() {
                screen.apply(Command::AppendChar(ch));
            }
        }
        for (i, line) in text.iter().enumerate().take(screen.size().rows) {
            let rendered = screen.render_text_line(i + 1);
            prop_assert_eq!(rendered.trim_end(), line.trim_end());
        }
    }
}
