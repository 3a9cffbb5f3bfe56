//! Report rendering for pipeline runs. Pure formatting — no decisions.

use crate::invitations::InvitationRunResults;
use crate::prospector::ProspectorResults;

impl std::fmt::Display for ProspectorResults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Prospector Run Complete ===")?;
        writeln!(f, "Candidates found:  {}", self.candidates_found)?;
        writeln!(f, "Profiles checked:  {}", self.profiles_checked)?;
        writeln!(f, "Leads created:     {}", self.leads_created.len())?;
        writeln!(
            f,
            "API calls:         {}/{}",
            self.api_calls_used, self.api_call_budget
        )?;

        if !self.skip_reasons.is_empty() {
            writeln!(f, "\nFiltered out:")?;
            for (reason, count) in &self.skip_reasons {
                writeln!(f, "  {reason}: {count}")?;
            }
        }

        if !self.leads_created.is_empty() {
            writeln!(f, "\nNew leads:")?;
            for lead in &self.leads_created {
                writeln!(f, "  {} ({}) — {}", lead.name, lead.business, lead.signal_detail)?;
            }
        }

        if !self.warnings.is_empty() {
            writeln!(f, "\nWarnings:")?;
            for warning in &self.warnings {
                writeln!(f, "  {warning}")?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for InvitationRunResults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Invitation Run Complete ===")?;
        writeln!(f, "Processed: {}", self.processed)?;
        writeln!(f, "Accepted:  {}", self.accepted)?;
        writeln!(f, "Declined:  {}", self.declined)?;
        writeln!(f, "Errors:    {}", self.errors)?;

        if !self.details.is_empty() {
            writeln!(f, "\nDecisions:")?;
            for detail in &self.details {
                writeln!(
                    f,
                    "  {} — {}: {}",
                    detail.name,
                    detail.decision.as_str(),
                    detail.reason
                )?;
            }
        }
        Ok(())
    }
}
