//! Lab: refactor a payments service that hardcodes a live Stripe key.
use super::{outcome, resource, seed, task, text_of};
use crate::lab::{normalize_whitespace, FileContents, LabScenario};
use anyhow::Result;
use regex::{Regex, RegexBuilder};

pub(super) const PAYMENTS_PATH: &str = "src/services/payments.ts";
pub(super) const ENV_EXAMPLE_PATH: &str = ".env.example";

const PAYMENTS_SEED: &str = r#"import Stripe from 'stripe';

const STRIPE_SECRET_KEY = 'sk_live_9f8a_fake_leaked_key_1205';

export function createStripeClient() {
  const client = new Stripe(STRIPE_SECRET_KEY, {
    apiVersion: '2024-06-01',
  });

  if (!client) {
    throw new Error('Stripe client failed to initialise');
  }

  return client;
}
"#;

const SEED_SCRIPT: &str = r#"import { createStripeClient } from '../src/services/payments';

async function run() {
  const stripe = createStripeClient();
  const keys = await stripe.customers.list({ limit: 1 });
  console.log('Fetched', keys.data.length, 'customers for smoke test');
}

run().catch((error) => {
  console.error('Seed script failed', error);
  process.exit(1);
});
"#;

const ENV_EXAMPLE_SEED: &str = "# Add your secrets here before running scripts
# STRIPE_SECRET_KEY=sk_live_fill_me_in
";

const INCIDENT_LOG: &str = "# Incident Log: Stripe Key Leak

* 09:45 - Security scanner detected stripe key in src/services/payments.ts
* 09:55 - Incident declared, CI tokens revoked
* 10:10 - Customers reported failed charges after key rotation

Action items:
- [ ] Remove hardcoded key from repository
- [ ] Fail fast when STRIPE_SECRET_KEY missing
- [ ] Update onboarding documentation
";

pub fn scenario() -> LabScenario {
    LabScenario {
        id: "hardcoded-secrets".to_string(),
        title: "Lab: Refactor Hardcoded Secrets".to_string(),
        description: "A payments microservice leaked a live Stripe secret. Refactor the implementation to pull credentials from the environment and fail fast when it is missing.".to_string(),
        intro_steps: vec![
            "Inspect the payments service to find how the secret is loaded today.".to_string(),
            "Move all secret material into environment variables with validation.".to_string(),
            "Update the onboarding docs so the next engineer knows what to configure.".to_string(),
        ],
        walkthrough_steps: vec![
            "Run `cat src/services/payments.ts` to find the inline key.".to_string(),
            "Run `edit src/services/payments.ts`, read process.env.STRIPE_SECRET_KEY and throw when it is missing.".to_string(),
            "Run `edit .env.example` and add a placeholder STRIPE_SECRET_KEY entry.".to_string(),
            "Run `validate` to check your work.".to_string(),
        ],
        files: vec![
            seed(PAYMENTS_PATH, "Payments Service", "typescript", false, PAYMENTS_SEED),
            seed("scripts/seed.ts", "Seed Script", "typescript", false, SEED_SCRIPT),
            seed(ENV_EXAMPLE_PATH, "Environment Template", "bash", false, ENV_EXAMPLE_SEED),
            seed("docs/incident-log.md", "Incident Log (Read-only)", "markdown", true, INCIDENT_LOG),
        ],
        tasks: vec![
            task(
                "remove-inline-key",
                "Delete the inline Stripe secret",
                "Ensure the payments service no longer contains the leaked sk_live secret.",
                "Replace the constant with an environment lookup instead of storing the key in the file.",
                removes_inline_key,
            ),
            task(
                "load-from-env",
                "Load secrets via environment variables",
                "Use process.env.STRIPE_SECRET_KEY and throw a descriptive error when it is missing.",
                "Access process.env.STRIPE_SECRET_KEY, validate it, and pass it to the Stripe constructor.",
                loads_key_from_env,
            ),
            task(
                "document-secret",
                "Document STRIPE_SECRET_KEY in .env.example",
                "Provide a placeholder value in the environment template without committing real secrets.",
                "Add STRIPE_SECRET_KEY=pk_live_your_placeholder or similar guidance in .env.example.",
                documents_secret,
            ),
        ],
        success: outcome(
            "Great work! 🎉",
            "The payments service now sources credentials securely. Commit the fix and rotate the Stripe key in production.",
        ),
        failure: Some(outcome(
            "Tasks remaining",
            "Review the checklist for any steps you may have missed.",
        )),
        resources: vec![
            resource(
                "OWASP Secrets Management",
                "https://cheatsheetseries.owasp.org/cheatsheets/Secrets_Management_Cheat_Sheet.html",
            ),
            resource(
                "Stripe Environment Variables Guide",
                "https://stripe.com/docs/development/quickstart#configure-environment",
            ),
        ],
    }
}

pub(super) fn removes_inline_key(files: &FileContents) -> Result<bool> {
    let content = text_of(files, PAYMENTS_PATH);
    let constant = Regex::new(r"const\s+STRIPE_SECRET_KEY\s*=")?;
    Ok(!content.contains("sk_live_") && !constant.is_match(content))
}

pub(super) fn loads_key_from_env(files: &FileContents) -> Result<bool> {
    let content = normalize_whitespace(text_of(files, PAYMENTS_PATH));
    if content.is_empty() {
        return Ok(false);
    }
    let uses_env = content.contains("process.env.STRIPE_SECRET_KEY");
    let direct_guard = Regex::new(r"if \(!process\.env\.STRIPE_SECRET_KEY\)")?;
    let assigned = Regex::new(r"const stripeSecret\s*=\s*process\.env\.STRIPE_SECRET_KEY")?;
    let throws = RegexBuilder::new(r"throw new Error\([^)]*(missing|STRIPE_SECRET_KEY)[^)]*\)")
        .case_insensitive(true)
        .build()?;
    let has_guard = direct_guard.is_match(&content)
        || (assigned.is_match(&content) && throws.is_match(&content));
    let constructs = Regex::new(r"new Stripe\(.*process\.env\.STRIPE_SECRET_KEY")?;
    Ok(uses_env && has_guard && constructs.is_match(&content))
}

pub(super) fn documents_secret(files: &FileContents) -> Result<bool> {
    let template = normalize_whitespace(text_of(files, ENV_EXAMPLE_PATH));
    if template.is_empty() {
        return Ok(false);
    }
    let live_key = RegexBuilder::new(r"sk_live_[a-z0-9]")
        .case_insensitive(true)
        .build()?;
    Ok(template.contains("STRIPE_SECRET_KEY=") && !live_key.is_match(&template))
}
