use iced::Size;

use timebox_engine::{Input, TimeboxId};

/// Messages for the Timebox Viewer application.
#[derive(Debug, Clone)]
pub enum Message {
    /// Pointer or key input on the chart, with the chart size it was
    /// measured against.
    Chart { input: Input, size: Size },

    /// User picked a timebox in the legend.
    SelectTimebox(TimeboxId),

    /// User removed a timebox from the legend.
    RemoveTimebox(TimeboxId),

    /// Remove every committed timebox.
    Reset,

    /// Write the committed timeboxes to the export path.
    Export,
}
