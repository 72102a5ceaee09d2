use super::TemplateDefinition;

const LYNX_NOTICE: &str = "Copyright {year} {holder}. All rights reserved.";

/// The project's own copyright holder, matched case-sensitively
pub const PROJECT_HOLDER: &str = "The Lynx Authors";

/// Body of the standard Apache-2.0 source header
const APACHE_2_0_BODY: &[&str] = &[
    "Licensed under the Apache License, Version 2.0 (the \"License\");",
    "you may not use this file except in compliance with the License.",
    "You may obtain a copy of the License at",
    "http://www.apache.org/licenses/LICENSE-2.0",
    "Unless required by applicable law or agreed to in writing, software",
    "distributed under the License is distributed on an \"AS IS\" BASIS,",
    "WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.",
    "See the License for the specific language governing permissions and",
    "limitations under the License.",
];

fn project_holder() -> Vec<String> {
    vec![PROJECT_HOLDER.to_string()]
}

fn lines(parts: &[&[&str]]) -> Vec<String> {
    parts.iter().flat_map(|part| part.iter().map(|line| line.to_string())).collect()
}

/// Templates shipped with the tool. Declaration order breaks specificity ties,
/// so the project's own notices come before upstream ones.
pub fn definitions() -> Vec<TemplateDefinition> {
    vec![
        TemplateDefinition {
            id: "standard-apache-full".to_string(),
            description: Some("Project notice followed by the full Apache-2.0 header".to_string()),
            third_party: false,
            requires_modification_notice: false,
            lines: lines(&[&[LYNX_NOTICE], APACHE_2_0_BODY]),
            holders: project_holder(),
        },
        TemplateDefinition {
            id: "standard-notice-apache".to_string(),
            description: Some("Project notice with the short Apache-2.0 pointer".to_string()),
            third_party: false,
            requires_modification_notice: false,
            lines: lines(&[&[
                LYNX_NOTICE,
                "Licensed under the Apache License Version 2.0 that can be found in the",
                "LICENSE file in the root directory of this source tree.",
            ]]),
            holders: project_holder(),
        },
        TemplateDefinition {
            id: "standard-notice".to_string(),
            description: Some("Project copyright line".to_string()),
            third_party: false,
            requires_modification_notice: false,
            lines: lines(&[&[LYNX_NOTICE]]),
            holders: project_holder(),
        },
        TemplateDefinition {
            id: "apache-2.0-with-modification".to_string(),
            description: Some("Upstream Apache-2.0 file carrying a modification notice".to_string()),
            third_party: true,
            requires_modification_notice: true,
            lines: lines(&[
                &["{attribution?}", "Copyright {year} {holder}"],
                APACHE_2_0_BODY,
                &["{modification_notice?}"],
            ]),
            holders: Vec::new(),
        },
        TemplateDefinition {
            id: "bsd-chromium-with-modification".to_string(),
            description: Some("Upstream BSD-style (Chromium) file carrying a modification notice".to_string()),
            third_party: true,
            requires_modification_notice: true,
            lines: lines(&[&[
                "{attribution?}",
                "Copyright {year} {holder}",
                "Use of this source code is governed by a BSD-style license that can be",
                "found in the LICENSE file.",
                "{modification_notice?}",
            ]]),
            holders: Vec::new(),
        },
    ]
}
