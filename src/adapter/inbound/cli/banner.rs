//! ASCII art banner for interactive mode.

use std::io::IsTerminal;

/// ANSI true-color escape sequences for the banner palette.
struct Colors {
    candle_up: &'static str,
    candle_wick: &'static str,
    title: &'static str,
    subtitle: &'static str,
    reset: &'static str,
}

const COLOR: Colors = Colors {
    candle_up: "\x1b[38;2;38;166;91m",
    candle_wick: "\x1b[38;2;120;190;140m",
    title: "\x1b[1;38;2;240;185;11m",
    subtitle: "\x1b[38;2;100;100;120m",
    reset: "\x1b[0m",
};

const PLAIN: Colors = Colors {
    candle_up: "",
    candle_wick: "",
    title: "",
    subtitle: "",
    reset: "",
};

/// Prints the pumpwatch banner to stdout.
///
/// Renders ANSI true-color when stdout is a terminal,
/// falls back to plain text otherwise.
pub fn print_banner() {
    let c = if std::io::stdout().is_terminal() {
        &COLOR
    } else {
        &PLAIN
    };

    let up = c.candle_up;
    let wk = c.candle_wick;
    let tt = c.title;
    let st = c.subtitle;
    let r = c.reset;

    println!(
        r#"
{wk}            │{r}
{wk}         │ {up}█{r}      {tt}    ____  __  ______ ___  ____ _       _____  ______________  __{r}
{wk}       │ {up}█ █{r}      {tt}   / __ \/ / / /  |/  / / __ \ |     / /   | /_  __/ ____/ / / /{r}
{wk}     │ {up}█ █{wk} │{r}      {tt}  / /_/ / / / / /|_/ / / /_/ / | /| / / /| |  / / / /   / /_/ /{r}
{up}   █ █ █{wk} │{r}        {tt} / ____/ /_/ / /  / / / ____/| |/ |/ / ___ | / / / /___/ __  /{r}
{up}   █ █{wk} │{r}          {tt}/_/    \____/_/  /_/ /_/     |__/|__/_/  |_|/_/  \____/_/ /_/{r}
{wk}   │{r}
                     {st}watching the tape so you don't have to{r}
"#
    );
}
