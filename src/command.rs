/// Work queued for the app loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    ClearScreen,
    /// Re-read the dataset from disk.
    Reload,
    DisplayNotice(String),
    DisplayError(String),
    DisplayHelp,
}
