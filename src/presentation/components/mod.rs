pub mod filters;
pub mod layout;
pub mod primitives;

pub use filters::DateRangeFilter;
pub use layout::Panel;
pub use primitives::{Notice, NoticeKind, Number, NumberSize, Skeleton, Status, Text, TextColor, TextSize};
