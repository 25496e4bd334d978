//! PDF Assembler: slices one tall bitmap across fixed-size pages.
//!
//! The image is scaled to the page width. Page 1 shows it from the top; every
//! further page shows the same image shifted up by one more page height,
//! until the remaining height is used up. All pages share a single image
//! XObject; the stream is stored raw, with no text layer.

use lopdf::{dictionary, Document, Object, Stream};
use thiserror::Error;

use crate::export::paper::PageSize;
use crate::export::raster::RasterImage;

const IMAGE_NAME: &str = "Im0";

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF serialization failed: {0}")]
    Write(#[from] lopdf::Error),

    #[error("PDF output failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid page size {width}x{height}pt")]
    InvalidPage { width: f32, height: f32 },
}

/// Where the image sits on one page: `offset_pt` is the distance from the
/// page top to the image top, downwards positive (so 0, −h, −2h, …).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePlacement {
    pub offset_pt: f32,
}

/// The full page plan for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfLayout {
    pub page: PageSize,
    pub image_width_pt: f32,
    pub image_height_pt: f32,
    pub placements: Vec<PagePlacement>,
}

/// Page offsets for an image `image_height_pt` tall on pages `page_height_pt`
/// tall. Always at least one page; stops once the remaining height is ≤ 0.
pub fn paginate(image_height_pt: f32, page_height_pt: f32) -> Vec<PagePlacement> {
    let mut placements = vec![PagePlacement { offset_pt: 0.0 }];
    if !(page_height_pt > 0.0) || !image_height_pt.is_finite() {
        return placements;
    }

    let mut height_left = image_height_pt - page_height_pt;
    while height_left > 0.0 {
        placements.push(PagePlacement {
            offset_pt: -(placements.len() as f32) * page_height_pt,
        });
        height_left -= page_height_pt;
    }
    placements
}

/// Scales `width_px` × `height_px` to the page width and plans the pages.
pub fn layout(width_px: u32, height_px: u32, page: PageSize) -> Result<PdfLayout, PdfError> {
    if !(page.width_pt > 0.0 && page.height_pt > 0.0) {
        return Err(PdfError::InvalidPage {
            width: page.width_pt,
            height: page.height_pt,
        });
    }
    let image_width_pt = page.width_pt;
    let image_height_pt = height_px as f32 * image_width_pt / width_px.max(1) as f32;

    Ok(PdfLayout {
        page,
        image_width_pt,
        image_height_pt,
        placements: paginate(image_height_pt, page.height_pt),
    })
}

/// Builds the PDF bytes for `image` following `plan`.
pub fn assemble(image: &RasterImage, plan: &PdfLayout) -> Result<Vec<u8>, PdfError> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(
        Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width() as i64,
                "Height" => image.height() as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            image.pixels().to_vec(),
        )
        .with_compression(false),
    );

    let mut kids: Vec<Object> = Vec::with_capacity(plan.placements.len());
    for placement in &plan.placements {
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            page_content(plan, placement).into_bytes(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    IMAGE_NAME => image_id,
                },
            },
            "MediaBox" => vec![
                0.into(),
                0.into(),
                plan.page.width_pt.into(),
                plan.page.height_pt.into(),
            ],
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

/// Draws the shared image on one page. PDF space has its origin at the
/// bottom-left, so the image's bottom edge sits at
/// `page_height - offset - image_height`.
fn page_content(plan: &PdfLayout, placement: &PagePlacement) -> String {
    let y = plan.page.height_pt - placement.offset_pt - plan.image_height_pt;
    format!(
        "q {:.3} 0 0 {:.3} 0 {:.3} cm /{IMAGE_NAME} Do Q\n",
        plan.image_width_pt, plan.image_height_pt, y
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: PageSize = PageSize {
        width_pt: 600.0,
        height_pt: 800.0,
    };

    #[test]
    fn test_two_and_a_half_pages_need_three() {
        let placements = paginate(2000.0, 800.0);
        assert_eq!(
            placements,
            vec![
                PagePlacement { offset_pt: 0.0 },
                PagePlacement { offset_pt: -800.0 },
                PagePlacement { offset_pt: -1600.0 },
            ]
        );
    }

    #[test]
    fn test_exact_fit_adds_no_blank_page() {
        assert_eq!(paginate(800.0, 800.0).len(), 1);
        assert_eq!(paginate(1600.0, 800.0).len(), 2);
    }

    #[test]
    fn test_short_image_gets_one_page() {
        assert_eq!(paginate(10.0, 800.0).len(), 1);
        assert_eq!(paginate(0.0, 800.0).len(), 1);
    }

    #[test]
    fn test_degenerate_page_height_terminates() {
        assert_eq!(paginate(5000.0, 0.0).len(), 1);
        assert_eq!(paginate(f32::INFINITY, 800.0).len(), 1);
    }

    #[test]
    fn test_layout_scales_to_page_width() {
        // 300px wide → scaled ×2 to 600pt; 1000px tall → 2000pt = 2.5 pages.
        let plan = layout(300, 1000, PAGE).unwrap();
        assert_eq!(plan.image_width_pt, 600.0);
        assert_eq!(plan.image_height_pt, 2000.0);
        assert_eq!(plan.placements.len(), 3);
    }

    #[test]
    fn test_layout_rejects_empty_page() {
        let page = PageSize {
            width_pt: 0.0,
            height_pt: 800.0,
        };
        assert!(layout(10, 10, page).is_err());
    }

    #[test]
    fn test_page_content_offsets() {
        let plan = layout(300, 1000, PAGE).unwrap();
        let first = page_content(&plan, &plan.placements[0]);
        let third = page_content(&plan, &plan.placements[2]);
        // Page 1: bottom edge at 800 - 0 - 2000.
        assert_eq!(first, "q 600.000 0 0 2000.000 0 -1200.000 cm /Im0 Do Q\n");
        // Page 3: bottom edge at 800 + 1600 - 2000.
        assert_eq!(third, "q 600.000 0 0 2000.000 0 400.000 cm /Im0 Do Q\n");
    }

    #[test]
    fn test_assembled_pdf_shares_one_image_across_pages() {
        let image = RasterImage::filled(3, 10, [200, 100, 50]).unwrap();
        let plan = layout(image.width(), image.height(), PAGE).unwrap();
        assert_eq!(plan.placements.len(), 3);

        let bytes = assemble(&image, &plan).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));

        let doc = Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 3);

        let mut image_refs = Vec::new();
        let mut contents = Vec::new();
        for page_id in pages.values() {
            let page = doc.get_dictionary(*page_id).unwrap();
            let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
            let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
            image_refs.push(xobjects.get(b"Im0").unwrap().as_reference().unwrap());
            contents.push(doc.get_page_content(*page_id).unwrap());
        }
        assert!(image_refs.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(contents.len(), 3);
        assert_ne!(contents[0], contents[1]);
        assert_ne!(contents[1], contents[2]);
    }
}
