// Library root
// -----------
// The binary (`main.rs`) wires these modules into the interactive CLI.
//
// Module responsibilities:
// - `api`: blocking HTTP client for the Gemini `generateContent`
//   endpoint, plus the serde types for its wire format.
// - `ui`: the terminal chat loop, command dispatch and all printing.
pub mod api;
pub mod ui;
