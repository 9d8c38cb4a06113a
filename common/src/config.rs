/// Presentation settings shared by every command.
#[derive(Debug, Clone, Copy, Default)]
pub struct Config {
    /// Hides the banner printed on startup.
    pub no_banner: bool,
    /// `0` prints everything, `1` drops headers and trees, `2` only prints
    /// summaries.
    pub quiet: u8,
}
