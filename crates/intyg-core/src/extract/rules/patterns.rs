//! Common regex patterns for certificate field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Swedish personal identity number: YYMMDD or YYYYMMDD, optional separator, 4 digits
    pub static ref PERSONAL_ID: Regex = Regex::new(
        r"\b(\d{6}|\d{8})[-+ ]?(\d{4})\b"
    ).unwrap();

    // Single date token. Groups 1-3 YMD, 4-6 DMY (or separated YY-MM-DD),
    // 7-9 compact YYYYMMDD, 10-12 compact YYMMDD.
    pub static ref DATE_TOKEN: Regex = Regex::new(
        r"\b(\d{4})[./\-\s]+(\d{1,2})[./\-\s]+(\d{1,2})\b|\b(\d{1,2})[./\-\s]+(\d{1,2})[./\-\s]+(\d{2,4})\b|\b(\d{4})(\d{2})(\d{2})\b|\b(\d{2})(\d{2})(\d{2})\b"
    ).unwrap();

    // Tail that turns a compact date into a personal id ("861027-4857")
    pub static ref PERSONAL_ID_TAIL: Regex = Regex::new(
        r"^\s*[-+ ]\s*\d{4}\b"
    ).unwrap();

    // Text between two date tokens that makes them a range
    pub static ref RANGE_JOINER: Regex = Regex::new(
        r"(?i)^\s*(?:[-\u{2013}\u{2014}\u{2212}]|till|to)\s*$"
    ).unwrap();

    // Competency code: a1, B2, STa3, ST-c14
    pub static ref COMPETENCY_CODE: Regex = Regex::new(
        r"(?i)\b(?:(ST)[-\s]?)?([abc])(\d{1,2})\b"
    ).unwrap();

    // Regulation citation or form numbering bleeding onto a value line
    pub static ref REGULATION_CITATION: Regex = Regex::new(
        r"(?i)\s*(?:\bSOSFS\s*\d{4}\s*:\s*\d+|\bHSLF-FS\s*\d{4}\s*:\s*\d+|\bBilaga\s*(?:nr\b)?\s*:?\s*\d{0,2}\b|\b\d{4}-\d-\d{4}\b).*$"
    ).unwrap();

    // Trailing purpose phrase printed after a site or subject ("... för auskultationen")
    pub static ref PURPOSE_SUFFIX: Regex = Regex::new(
        r"(?i)\s*\bf[öo]r\s+(?:auskultationen|auskultation|kursen|den\s+kliniska\s+tj[äa]nstg[öo]ringen|tj[äa]nstg[öo]ringen)\s*$"
    ).unwrap();

    // Trailing punctuation left after cutting a value
    pub static ref TRAILING_PUNCTUATION: Regex = Regex::new(
        r"\s*[.,;:\-]+\s*$"
    ).unwrap();

    // Checkbox mark before or after a role word
    pub static ref CHECKBOX_ROLE: Regex = Regex::new(
        r"(?i)^(?:☒|✓|✗|☑|✔|\[x\]|x)\s*(kursledare|handledare)\s*$|^(kursledare|handledare)\s*(?:☒|✓|✗|☑|✔|\[x\]|x)\s*$"
    ).unwrap();

    // Inline applicant specialty ("Specialitet som ansökan avser: Kirurgi")
    pub static ref SPECIALTY_INLINE: Regex = Regex::new(
        r"(?i)specialitet\s+som\s+ans[öo]kan\s+avser\s*:?\s*([^\n]+)"
    ).unwrap();

    // Label lines the whole-text fallback reads a value after
    pub static ref PERSONAL_ID_LABEL: Regex = Regex::new(
        r"(?i)^personnummer\b"
    ).unwrap();

    pub static ref DELMAL_LABEL: Regex = Regex::new(
        r"(?i)^delm[åa]l\b"
    ).unwrap();

    pub static ref DESCRIPTION_LABEL: Regex = Regex::new(
        r"(?i)^(?:beskrivning\s+av|utbildningsaktiviteter\s+som)\b"
    ).unwrap();

    // Printed labels that end a free-text block in the whole-text fallback
    pub static ref BLOCK_STOPS: Vec<Regex> = vec![
        Regex::new(r"(?i)^(?:intygande|handledare|kursledare|specialitet|tjänsteställe|tjänstgöringsställe)\b").unwrap(),
        Regex::new(r"(?i)^(?:namnförtydligande|namnteckning|ort\s+och\s+datum|ort\s+o\s+datum)\b").unwrap(),
        Regex::new(r"(?i)^(?:hur\s+det\s+kontrollerats|kursens\s+ämne|period|delmål)\b").unwrap(),
    ];

    // Page counters such as "1 (1)" that OCR places next to signature boxes
    pub static ref PAGE_COUNTER: Regex = Regex::new(
        r"^\d+\s*\(?\d*\)?$"
    ).unwrap();
}
