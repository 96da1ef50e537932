//! Destination CRM systems and their import formatting guidance.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Destination CRM selected by the operator.
///
/// Unknown identifiers are kept verbatim in [`CrmTarget::Other`] and carry
/// no extra guidance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CrmTarget {
    Salesforce,
    RaisersEdge,
    Virtuous,
    Admire,
    EveryAction,
    Other(String),
}

impl CrmTarget {
    /// Known CRMs in display order.
    pub const KNOWN: [CrmTarget; 5] = [
        CrmTarget::Salesforce,
        CrmTarget::RaisersEdge,
        CrmTarget::Virtuous,
        CrmTarget::Admire,
        CrmTarget::EveryAction,
    ];

    /// Stable lowercase identifier used on the command line.
    pub fn id(&self) -> &str {
        match self {
            CrmTarget::Salesforce => "salesforce",
            CrmTarget::RaisersEdge => "raisers-edge",
            CrmTarget::Virtuous => "virtuous",
            CrmTarget::Admire => "admire",
            CrmTarget::EveryAction => "everyaction",
            CrmTarget::Other(id) => id,
        }
    }

    /// Name as written in the mapping summary's `target_crm`.
    pub fn display_name(&self) -> &str {
        match self {
            CrmTarget::Salesforce => "Salesforce",
            CrmTarget::RaisersEdge => "Raiser's Edge",
            CrmTarget::Virtuous => "Virtuous",
            CrmTarget::Admire => "Admire",
            CrmTarget::EveryAction => "EveryAction",
            CrmTarget::Other(id) => id,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, CrmTarget::Other(_))
    }

    /// CRM-specific formatting guidance appended to the generation request.
    ///
    /// Empty for [`CrmTarget::Other`].
    pub fn guidance(&self) -> &'static str {
        match self {
            CrmTarget::Salesforce => SALESFORCE_GUIDANCE,
            CrmTarget::RaisersEdge => RAISERS_EDGE_GUIDANCE,
            CrmTarget::Virtuous => VIRTUOUS_GUIDANCE,
            CrmTarget::Admire => ADMIRE_GUIDANCE,
            CrmTarget::EveryAction => EVERYACTION_GUIDANCE,
            CrmTarget::Other(_) => "",
        }
    }
}

impl Default for CrmTarget {
    fn default() -> Self {
        CrmTarget::Other("other".to_string())
    }
}

impl fmt::Display for CrmTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for CrmTarget {
    type Err = Infallible;

    /// Total parse: anything unrecognised becomes [`CrmTarget::Other`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        Ok(match normalized.as_str() {
            "salesforce" | "npsp" => CrmTarget::Salesforce,
            "raisersedge" | "re" | "renxt" => CrmTarget::RaisersEdge,
            "virtuous" => CrmTarget::Virtuous,
            "admire" => CrmTarget::Admire,
            "everyaction" | "ngpvan" => CrmTarget::EveryAction,
            _ => CrmTarget::Other(s.trim().to_string()),
        })
    }
}

// Guidance follows each CRM's common import template and is not read from
// the CRM. Every block states the date and amount format at minimum.
const SALESFORCE_GUIDANCE: &str = "\
Salesforce (NPSP) formatting:
- Dates must be YYYY-MM-DD.
- Amounts are plain decimals with no currency symbol or thousands separator (e.g. 1250.00).
- Close Date is required on every Opportunity row; Stage should be \"Closed Won\" for completed gifts.
- Contact First Name and Last Name are separate columns; Account Name for households is \"<Last Name> Household\" unless an organization is given.
- Checkbox columns take TRUE or FALSE.";

const RAISERS_EDGE_GUIDANCE: &str = "\
Raiser's Edge formatting:
- Dates must be MM/DD/YYYY.
- Gift Amount is a decimal with no currency symbol.
- Constituent names are split into Title, First Name, Middle Name and Last Name; keep titles such as Mr./Mrs. in the Title column.
- Fund, Campaign and Appeal values must match existing record IDs; when unsure, flag the rule for review.
- Gift Type is usually \"Cash\" unless the source says otherwise.";

const VIRTUOUS_GUIDANCE: &str = "\
Virtuous formatting:
- Dates must be MM/DD/YYYY.
- Amounts are decimals without currency symbols.
- Contact Type is \"Household\" for individuals and \"Organization\" for companies or foundations.
- Use the Project Code column for fund designations and flag unknown projects for review.
- Phone numbers use (XXX) XXX-XXXX.";

const ADMIRE_GUIDANCE: &str = "\
Admire formatting:
- Dates must be YYYY-MM-DD.
- Donation Amount is a decimal with two places and no currency symbol.
- Donor names go in separate First Name and Last Name columns; drop honorifics such as Mr./Mrs./Ms.
- Tribute text (\"In honor of\", \"In memory of\") belongs in the Tribute column, not Notes.
- Country uses the two-letter ISO code (e.g. US).";

const EVERYACTION_GUIDANCE: &str = "\
EveryAction formatting:
- Dates must be MM/DD/YYYY.
- Amount is a decimal without currency symbol.
- Address fields are Address Line 1, Address Line 2, City, State/Province (two-letter code) and Zip/Postal.
- Designation must match an existing designation name; when unsure, flag the rule for review.
- Contribution Source Code can be a Static value chosen by the operator.";
