use crate::ErrorLocation;
use std::panic::Location;

/// **VALUE**: Verifies that `ErrorLocation::from()` captures file, line, and column.
///
/// **WHY THIS MATTERS**: Every error variant in the workspace embeds an ErrorLocation.
/// If capture breaks, every classified failure loses its origin.
///
/// **BUG THIS CATCHES**: Would catch if `Location::caller()` propagation or the
/// field extraction breaks.
#[test]
#[track_caller]
fn given_location_caller_when_error_location_created_then_captures_file_line_column() {
    // GIVEN/WHEN: Capturing the current location
    let location = ErrorLocation::from(Location::caller());

    // THEN: File, line and column are populated
    assert!(
        location.file.contains("error_location.rs"),
        "Should capture file path"
    );
    assert!(location.line > 0, "Should capture line number");
    assert!(location.column > 0, "Should capture column number");
}

/// **VALUE**: Verifies the bracketed `[file:line:column]` Display format.
///
/// **WHY THIS MATTERS**: Error messages are logged and printed by the CLI; the
/// location suffix is how a failure is traced back to the source.
///
/// **BUG THIS CATCHES**: Would catch a Display change that drops brackets or fields.
#[test]
#[track_caller]
fn given_error_location_when_formatted_then_produces_bracketed_format() {
    // GIVEN: An ErrorLocation
    let location = ErrorLocation::from(Location::caller());

    // WHEN: Formatting as string
    let formatted = format!("{}", location);

    // THEN: "[file:line:column]"
    assert!(formatted.starts_with('['), "Should start with '['");
    assert!(formatted.ends_with(']'), "Should end with ']'");
    assert!(formatted.contains(&location.line.to_string()));
    assert_eq!(
        formatted.matches(':').count(),
        2,
        "Should have exactly 2 colons"
    );
}

/// **VALUE**: Verifies that `#[track_caller]` gives each call site its own line.
///
/// **WHY THIS MATTERS**: Helpers that build errors are marked `#[track_caller]`;
/// without propagation every error would point at the helper.
///
/// **BUG THIS CATCHES**: Would catch removal of `#[track_caller]` on helpers.
#[test]
fn given_multiple_call_sites_when_capturing_location_then_each_has_unique_line() {
    // GIVEN: A helper that captures location
    #[track_caller]
    fn capture_location() -> ErrorLocation {
        ErrorLocation::from(Location::caller())
    }

    // WHEN: Capturing from two sites
    let loc1 = capture_location();
    let loc2 = capture_location();

    // THEN: Same file, consecutive lines
    assert_eq!(loc1.file, loc2.file, "Should have same file");
    assert_eq!(loc1.line + 1, loc2.line, "Lines should be sequential");
}
