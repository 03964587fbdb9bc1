mod contacts;
mod dates;
mod docx;
mod education;
mod experience;
mod locate;
mod parser;
mod projects;
mod raw;
mod run;
mod schema;
mod sections;
mod skills;
mod testimonials;
#[cfg(test)]
mod tests;
mod text;

pub use run::{output_paths, run};
