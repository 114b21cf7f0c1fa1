//! Prompt text sent alongside the product photo.

/// Instructions for title, description and SEO tags
///
/// When the seller supplied a description it is authoritative and the photo
/// only adds visual context; otherwise the photo alone drives the copy.
pub fn product_details_prompt(description: Option<&str>) -> String {
    let mut prompt = String::from(
        "You are an AI assistant specializing in generating e-commerce product details.\n\n",
    );

    match description {
        Some(description) => {
            prompt.push_str(
                "The seller's description below is ground truth: keep every fact it states \
                 (material, fit, use) and never contradict it. Use the attached product image \
                 only as visual context for colour, style and details the description omits.\n\n",
            );
            prompt.push_str("Seller description:\n");
            prompt.push_str(description.trim());
            prompt.push_str("\n\n");
        }
        None => {
            prompt.push_str("Based on the attached product image, describe the product.\n\n");
        }
    }

    prompt.push_str(
        "Generate a concise product title, a persuasive product description, and a list of \
         SEO tags. Answer with a JSON object with the fields title, description and seoTags.",
    );
    prompt
}

/// Instructions for marketing campaign suggestions
pub fn campaign_ideas_prompt(description: Option<&str>) -> String {
    let mut prompt = String::from(
        "You are a marketing expert. Generate creative marketing campaign ideas for the \
         product shown in the attached image.\n\n",
    );

    if let Some(description) = description {
        prompt.push_str("Product description:\n");
        prompt.push_str(description.trim());
        prompt.push_str("\n\n");
    }

    prompt.push_str(
        "Provide a list of campaign ideas to improve the product's promotion. Each idea must \
         be concise and actionable. Answer with a JSON object with the field campaignIdeas.",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_is_ground_truth() {
        let prompt = product_details_prompt(Some("  100% linen, relaxed fit  "));
        assert!(prompt.contains("ground truth"));
        assert!(prompt.contains("100% linen, relaxed fit\n"));
    }

    #[test]
    fn test_image_only_prompt() {
        let prompt = product_details_prompt(None);
        assert!(!prompt.contains("Seller description"));
        assert!(prompt.contains("seoTags"));
    }

    #[test]
    fn test_campaign_prompt_mentions_description() {
        assert!(campaign_ideas_prompt(Some("Floral print tee")).contains("Floral print tee"));
        assert!(!campaign_ideas_prompt(None).contains("Product description"));
    }
}
