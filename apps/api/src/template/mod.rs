// Résumé template text: `## <Section>` headers with `Key：Value` lines in the
// identity / job-target sections and free-text blocks everywhere else.

pub mod parser;
pub mod placeholder;
pub mod section;
pub mod writer;

pub use parser::{parse_template, ParsedTemplate};
pub use writer::write_template;
