// Bot-controlled team behaviour: candidate scoring and pick selection.

pub mod decide;
pub mod scoring;
